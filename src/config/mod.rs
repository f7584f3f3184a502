//! Policy configuration
//!
//! [`PolicyConfig`] is the raw, user-facing form of the policy (TOML file or
//! CLI flags). [`PolicyConfig::into_policy`] validates it into a
//! [`TrustPolicy`]; nothing downstream re-validates.

mod storage;

pub use storage::{CONFIG_FILE, config_candidates, find_config, load_config};

use crate::error::{Error, Result};
use crate::policy::TrustPolicy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Raw policy settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Approvals required without elevation (defaults to 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_approvals: Option<u32>,
    /// App slugs, without the `[bot]` suffix (e.g. `renovate`)
    pub trusted_apps: Vec<String>,
    /// Logins that are always trusted
    pub trusted_machine_users: Vec<String>,
    /// Logins, or `/regex/` patterns, of untrusted machine users
    pub untrusted_machine_users: Vec<String>,
}

impl PolicyConfig {
    /// Layer `other` on top of `self`
    ///
    /// List entries are appended; `other.minimum_approvals` wins when set.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.trusted_apps.extend(other.trusted_apps);
        self.trusted_machine_users.extend(other.trusted_machine_users);
        self.untrusted_machine_users.extend(other.untrusted_machine_users);
        if other.minimum_approvals.is_some() {
            self.minimum_approvals = other.minimum_approvals;
        }
        self
    }

    /// Validate into a [`TrustPolicy`]
    pub fn into_policy(self) -> Result<TrustPolicy> {
        let minimum_approvals = match self.minimum_approvals {
            None => NonZeroU32::MIN,
            Some(n) => NonZeroU32::new(n).ok_or_else(|| {
                Error::InvalidPolicy("minimum_approvals must be at least 1".to_string())
            })?,
        };
        let mut policy = TrustPolicy::new(minimum_approvals);

        for app in entries(&self.trusted_apps) {
            validate_app_name(app)?;
            policy = policy.with_trusted_app(app);
        }

        for login in entries(&self.trusted_machine_users) {
            policy = policy.with_trusted_machine_user(login);
        }

        for entry in entries(&self.untrusted_machine_users) {
            if let Some(pattern) = regex_literal(entry) {
                let re = Regex::new(pattern).map_err(|e| {
                    Error::InvalidPolicy(format!(
                        "invalid untrusted machine user pattern {entry}: {e}"
                    ))
                })?;
                policy = policy.with_untrusted_machine_user_regex(re);
            } else {
                policy = policy.with_untrusted_machine_user(entry);
            }
        }

        Ok(policy)
    }
}

/// Trimmed, non-empty entries that aren't `#` comments
fn entries(values: &[String]) -> impl Iterator<Item = &str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.starts_with('#'))
}

fn validate_app_name(app: &str) -> Result<()> {
    if app.ends_with("[bot]") {
        return Err(Error::InvalidPolicy(format!(
            "trusted app {app} must not end with [bot]"
        )));
    }
    if app.contains('/') {
        return Err(Error::InvalidPolicy(format!(
            "trusted app {app} must not include /"
        )));
    }
    Ok(())
}

/// The pattern inside `/.../`, if `entry` is written that way
fn regex_literal(entry: &str) -> Option<&str> {
    entry
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
}
