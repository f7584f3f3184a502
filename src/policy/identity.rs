//! Identity predicates - pure functions shared by every classifier

use super::TrustPolicy;
use crate::types::{APP_RESOURCE_PREFIX, User};

/// Why an identity calls for an extra approval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationReason {
    /// No GitHub identity at all
    Unlinked,
    /// App account not listed in `trusted_apps`
    UntrustedApp,
    /// Machine user matched by the untrusted set or patterns
    UntrustedMachineUser,
}

/// Whether `user` is an app (bot) account
pub fn is_app(user: &User) -> bool {
    user.resource_path.starts_with(APP_RESOURCE_PREFIX)
}

/// Whether `login` is an untrusted machine user
///
/// `trusted_machine_users` takes precedence over both the untrusted set and
/// the patterns.
pub fn is_untrusted_machine_user(login: &str, policy: &TrustPolicy) -> bool {
    if policy.trusted_machine_users.contains(login) {
        return false;
    }
    if policy.untrusted_machine_users.contains(login) {
        return true;
    }
    policy
        .untrusted_machine_user_regexps
        .iter()
        .any(|re| re.is_match(login))
}

/// Which rule, if any, makes `user` require elevation
pub fn elevation_reason(user: Option<&User>, policy: &TrustPolicy) -> Option<ElevationReason> {
    let Some(user) = user.filter(|u| u.is_linked()) else {
        return Some(ElevationReason::Unlinked);
    };
    if is_app(user) {
        return (!policy.trusted_apps.contains(&user.resource_path))
            .then_some(ElevationReason::UntrustedApp);
    }
    is_untrusted_machine_user(&user.login, policy).then_some(ElevationReason::UntrustedMachineUser)
}

/// Whether `user` requires one more approval than the configured minimum
pub fn requires_elevation(user: Option<&User>, policy: &TrustPolicy) -> bool {
    elevation_reason(user, policy).is_some()
}
