//! CLI command implementations

pub mod auth;
pub mod check;
pub mod context;
pub mod evaluate;
pub mod report;
pub mod style;

pub use auth::run_auth;
pub use check::{CheckOptions, run_check};
pub use context::PolicyArgs;
pub use evaluate::run_evaluate;
