use serde::{Deserialize, Serialize};

use glyph_config::{
    ONBOARDING_ACCOUNT_LOCATION, ONBOARDING_COMPLETE_LOCATION, ONBOARDING_RUNTIME_LOCATION,
    ONBOARDING_THEME_LOCATION, ONBOARDING_WELCOME_LOCATION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    Welcome,
    Theme,
    Account,
    Runtime,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("location {0:?} is not an onboarding step")]
pub struct UnknownLocation(pub String);

impl WizardStep {
    /// Steps in the order the wizard walks them.
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Welcome,
        WizardStep::Theme,
        WizardStep::Account,
        WizardStep::Runtime,
        WizardStep::Complete,
    ];

    pub fn index(self) -> usize {
        match self {
            WizardStep::Welcome => 0,
            WizardStep::Theme => 1,
            WizardStep::Account => 2,
            WizardStep::Runtime => 3,
            WizardStep::Complete => 4,
        }
    }

    pub fn location(self) -> &'static str {
        match self {
            WizardStep::Welcome => ONBOARDING_WELCOME_LOCATION,
            WizardStep::Theme => ONBOARDING_THEME_LOCATION,
            WizardStep::Account => ONBOARDING_ACCOUNT_LOCATION,
            WizardStep::Runtime => ONBOARDING_RUNTIME_LOCATION,
            WizardStep::Complete => ONBOARDING_COMPLETE_LOCATION,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Welcome => "Welcome",
            WizardStep::Theme => "Theme",
            WizardStep::Account => "Account",
            WizardStep::Runtime => "Java",
            WizardStep::Complete => "Complete",
        }
    }

    /// Exact match against the step locations. Anything else, including a
    /// trailing slash, is unknown.
    pub fn from_location(location: &str) -> Result<WizardStep, UnknownLocation> {
        Self::ALL
            .into_iter()
            .find(|s| s.location() == location)
            .ok_or_else(|| UnknownLocation(location.to_string()))
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|ix| Self::ALL[ix])
    }

    pub fn is_first(self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

/// Externally observed inputs to the gating predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Readiness {
    pub profile_selected: bool,
    pub has_profiles: bool,
    pub runtime_ready: bool,
}

/// Whether forward progression from `step` is disallowed. `None` stands for an
/// unmatched location, which is always blocked.
pub fn is_blocked(step: Option<WizardStep>, readiness: Readiness) -> bool {
    match step {
        Some(WizardStep::Welcome) | Some(WizardStep::Theme) | Some(WizardStep::Complete) => false,
        Some(WizardStep::Account) => !readiness.profile_selected || !readiness.has_profiles,
        Some(WizardStep::Runtime) => !readiness.runtime_ready,
        None => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
    #[default]
    System,
}
