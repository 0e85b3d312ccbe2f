use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info, warn};

use glyph_config::{commands, LAUNCHER_LOCATION};
use glyph_core::{is_blocked, Readiness, Theme, UnknownLocation, WizardStep};

use crate::error::BackendError;
use crate::memo::Memo;
use crate::ports::{BackendGateway, Navigator};
use crate::profiles::ProfileStore;
use crate::store::Store;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    UnknownLocation(#[from] UnknownLocation),
    #[error("already at the first onboarding step")]
    AtFirstStep,
    #[error("already at the last onboarding step")]
    AtLastStep,
    #[error("cannot leave {} until it is complete", .0.label())]
    Blocked(WizardStep),
    #[error("could not mark setup complete: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardErrorKind {
    UnknownLocation,
    Boundary,
    Blocked,
    Backend,
}

impl WizardError {
    pub fn kind(&self) -> WizardErrorKind {
        match self {
            WizardError::UnknownLocation(_) => WizardErrorKind::UnknownLocation,
            WizardError::AtFirstStep | WizardError::AtLastStep => WizardErrorKind::Boundary,
            WizardError::Blocked(_) => WizardErrorKind::Blocked,
            WizardError::Backend(_) => WizardErrorKind::Backend,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeSetup {
    pub complete: bool,
    pub show_automatic_popup: bool,
    pub show_manual_entries: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardingState {
    pub theme: Theme,
    pub runtime: RuntimeSetup,
}

/// Linear first-run wizard. The current step is never stored: it is read
/// from the navigator's location every time.
pub struct WizardNavigator {
    gateway: Arc<dyn BackendGateway>,
    navigator: Arc<dyn Navigator>,
    profiles: Arc<ProfileStore>,
    state: Store<OnboardingState>,
    blocked: Mutex<Memo<(String, Readiness), bool>>,
}

impl WizardNavigator {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        navigator: Arc<dyn Navigator>,
        profiles: Arc<ProfileStore>,
    ) -> Self {
        Self {
            gateway,
            navigator,
            profiles,
            state: Store::default(),
            blocked: Mutex::new(Memo::new()),
        }
    }

    pub fn location(&self) -> String {
        self.navigator.location()
    }

    pub fn current_step(&self) -> Result<WizardStep, WizardError> {
        Ok(WizardStep::from_location(&self.navigator.location())?)
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            profile_selected: self.profiles.selected_id().is_some(),
            has_profiles: self.profiles.has_profiles(),
            runtime_ready: self.runtime_ready(),
        }
    }

    /// Whether forward progression from the current location is disallowed.
    pub fn is_blocked(&self) -> bool {
        let location = self.navigator.location();
        let readiness = self.readiness();

        let mut memo = self.blocked.lock().unwrap_or_else(PoisonError::into_inner);
        memo.get_or_compute((location.clone(), readiness), || {
            match WizardStep::from_location(&location) {
                Ok(step) => is_blocked(Some(step), readiness),
                Err(e) => {
                    warn!(%location, "is_blocked: {e}");
                    is_blocked(None, readiness)
                }
            }
        })
    }

    pub fn advance(&self) -> Result<WizardStep, WizardError> {
        let step = self.step_for_transition("next")?;

        if self.is_blocked() {
            warn!(step = step.label(), "Cannot navigate to next step: current step is incomplete");
            return Err(WizardError::Blocked(step));
        }

        let Some(next) = step.next() else {
            warn!(step = step.label(), "Cannot navigate past the last onboarding step");
            return Err(WizardError::AtLastStep);
        };

        self.navigator.navigate(next.location());
        Ok(next)
    }

    pub fn retreat(&self) -> Result<WizardStep, WizardError> {
        let step = self.step_for_transition("previous")?;

        let Some(previous) = step.previous() else {
            warn!(step = step.label(), "Cannot navigate before the first onboarding step");
            return Err(WizardError::AtFirstStep);
        };

        self.navigator.navigate(previous.location());
        Ok(previous)
    }

    fn step_for_transition(&self, direction: &str) -> Result<WizardStep, WizardError> {
        self.current_step().inspect_err(|e| {
            warn!(direction, "Cannot navigate, current location is unknown: {e}");
        })
    }

    /// Marks onboarding complete on the backend and enters the launcher.
    /// On failure nothing moves and the user may retry.
    pub async fn finish(&self) -> Result<(), WizardError> {
        if let Err(e) = self.gateway.mark_setup_complete().await {
            error!(command = commands::MARK_SETUP_COMPLETE, "Failed to set onboarding complete: {e}");
            return Err(e.into());
        }

        info!("Onboarding complete, navigating to launcher");
        self.navigator.navigate(LAUNCHER_LOCATION);
        Ok(())
    }

    // --- Onboarding choices ---

    pub fn state(&self) -> OnboardingState {
        self.state.state()
    }

    pub fn theme(&self) -> Theme {
        self.state.read(|s| s.theme)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.with_state_mut(|s| s.theme = theme);
        info!(?theme, "Theme selected");
    }

    pub fn runtime_setup(&self) -> RuntimeSetup {
        self.state.read(|s| s.runtime)
    }

    pub fn runtime_ready(&self) -> bool {
        self.state.read(|s| s.runtime.complete)
    }

    pub fn set_runtime_ready(&self, ready: bool) {
        self.state.with_state_mut(|s| s.runtime.complete = ready);
    }

    pub fn open_automatic_runtime_setup(&self) {
        self.state.with_state_mut(|s| {
            s.runtime.show_automatic_popup = true;
            s.runtime.show_manual_entries = false;
        });
    }

    pub fn toggle_manual_runtime_entries(&self) {
        self.state.with_state_mut(|s| {
            s.runtime.show_manual_entries = !s.runtime.show_manual_entries;
            if s.runtime.show_manual_entries {
                s.runtime.show_automatic_popup = false;
            }
        });
    }

    pub fn complete_automatic_runtime_setup(&self) {
        self.state.with_state_mut(|s| {
            s.runtime = RuntimeSetup {
                complete: true,
                show_automatic_popup: false,
                show_manual_entries: false,
            };
        });
        info!("Automatic Java setup complete");
    }

    pub fn complete_manual_runtime_setup(&self) {
        self.state.with_state_mut(|s| s.runtime.complete = true);
        info!("Manual Java setup complete");
    }
}
