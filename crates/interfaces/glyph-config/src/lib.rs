//! Central configuration constants for navigation, backend names and cache windows.

/// Onboarding wizard locations, in walk order.
pub const ONBOARDING_WELCOME_LOCATION: &str = "#/onboarding";
pub const ONBOARDING_THEME_LOCATION: &str = "#/onboarding/theme";
pub const ONBOARDING_ACCOUNT_LOCATION: &str = "#/onboarding/account";
pub const ONBOARDING_RUNTIME_LOCATION: &str = "#/onboarding/java";
pub const ONBOARDING_COMPLETE_LOCATION: &str = "#/onboarding/complete";

/// Main application view, entered once onboarding is finished.
pub const LAUNCHER_LOCATION: &str = "#/launcher";

/// Backend event channel names.
pub const LOGIN_DETAILS_EVENT: &str = "login-details";
pub const INSTANCE_LIST_CHANGED_EVENT: &str = "instance-list-updated";

/// Backend command names, used for log context and error reporting.
pub mod commands {
    pub const FETCH_PROFILES: &str = "get_minecraft_profiles";
    pub const FETCH_ACTIVE_ACCOUNT: &str = "get_active_account";
    pub const SWITCH_ACCOUNT: &str = "switch_account";
    pub const DELETE_ACCOUNT: &str = "delete_account";
    pub const LOGIN: &str = "login";
    pub const CANCEL_LOGIN: &str = "cancel_login";
    pub const FETCH_INSTANCES: &str = "get_instances";
    pub const MARK_SETUP_COMPLETE: &str = "set_onboarding_complete";
    pub const FETCH_AVATAR: &str = "get_avatar";
}

/// How long a fetched avatar stays fresh. 1 hour.
pub const AVATAR_CACHE_TTL_SECS: i64 = 60 * 60;

/// Default delay before the simulated backend approves a device login.
pub const DEFAULT_SIMULATED_APPROVAL_DELAY_MS: u64 = 1_500;

/// Upper bound accepted for the simulated approval delay. 1 minute.
pub const MAX_SIMULATED_APPROVAL_DELAY_MS: u64 = 60_000;

/// Convenience function to clamp an approval delay into the accepted range.
pub fn clamp_approval_delay(ms: u64) -> u64 {
    ms.min(MAX_SIMULATED_APPROVAL_DELAY_MS)
}
