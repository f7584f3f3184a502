//! review-gate: validate pull request approvals against a trust policy
//!
//! The evaluation core lives in [`evaluate`] and [`policy`]; it is pure and
//! operates on an already-fetched [`types::PullRequestSnapshot`]. The
//! [`platform`] and [`auth`] modules fetch that snapshot from GitHub, and
//! [`config`] turns raw policy settings into a [`policy::TrustPolicy`].

pub mod auth;
pub mod check;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod platform;
pub mod policy;
pub mod types;
