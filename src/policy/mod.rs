//! Trust policy and identity predicates
//!
//! [`TrustPolicy`] is the already-validated form of the user's settings. The
//! predicates in [`identity`] are the only place trust decisions are made;
//! every classifier goes through them.

mod identity;

pub use identity::{
    ElevationReason, elevation_reason, is_app, is_untrusted_machine_user, requires_elevation,
};

use crate::types::APP_RESOURCE_PREFIX;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::num::NonZeroU32;

/// Which automation accounts and machine users are trusted
#[derive(Debug, Clone)]
pub struct TrustPolicy {
    /// Resource paths (`/apps/<name>`) of trusted apps
    pub trusted_apps: BTreeSet<String>,
    /// Logins that are always trusted, overriding the untrusted rules
    pub trusted_machine_users: BTreeSet<String>,
    /// Logins of untrusted machine users
    pub untrusted_machine_users: BTreeSet<String>,
    /// Patterns matching logins of untrusted machine users, checked in order
    pub untrusted_machine_user_regexps: Vec<Regex>,
    /// Approvals required when nothing calls for elevation
    pub minimum_approvals: NonZeroU32,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            trusted_apps: BTreeSet::new(),
            trusted_machine_users: BTreeSet::new(),
            untrusted_machine_users: BTreeSet::new(),
            untrusted_machine_user_regexps: Vec::new(),
            minimum_approvals: NonZeroU32::MIN,
        }
    }
}

impl TrustPolicy {
    /// Empty policy requiring `minimum_approvals` approvals
    pub fn new(minimum_approvals: NonZeroU32) -> Self {
        Self {
            minimum_approvals,
            ..Self::default()
        }
    }

    /// Trust the app with the given slug (e.g. `renovate`)
    #[must_use]
    pub fn with_trusted_app(mut self, slug: &str) -> Self {
        self.trusted_apps.insert(format!("{APP_RESOURCE_PREFIX}{slug}"));
        self
    }

    /// Always trust `login`
    #[must_use]
    pub fn with_trusted_machine_user(mut self, login: impl Into<String>) -> Self {
        self.trusted_machine_users.insert(login.into());
        self
    }

    /// Treat `login` as an untrusted machine user
    #[must_use]
    pub fn with_untrusted_machine_user(mut self, login: impl Into<String>) -> Self {
        self.untrusted_machine_users.insert(login.into());
        self
    }

    /// Treat logins matching `pattern` as untrusted machine users
    #[must_use]
    pub fn with_untrusted_machine_user_regex(mut self, pattern: Regex) -> Self {
        self.untrusted_machine_user_regexps.push(pattern);
        self
    }
}

// Regex has no Serialize impl; patterns are rendered in their `/.../` form.
impl Serialize for TrustPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let patterns: Vec<String> = self
            .untrusted_machine_user_regexps
            .iter()
            .map(|r| format!("/{}/", r.as_str()))
            .collect();
        let mut s = serializer.serialize_struct("TrustPolicy", 5)?;
        s.serialize_field("trusted_apps", &self.trusted_apps)?;
        s.serialize_field("trusted_machine_users", &self.trusted_machine_users)?;
        s.serialize_field("untrusted_machine_users", &self.untrusted_machine_users)?;
        s.serialize_field("untrusted_machine_user_regexps", &patterns)?;
        s.serialize_field("minimum_approvals", &self.minimum_approvals)?;
        s.end()
    }
}
