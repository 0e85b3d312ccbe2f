pub mod auth;
pub mod avatar;
pub mod error;
pub mod instances;
pub mod kernel;
mod listener;
pub mod memo;
pub mod ports;
pub mod profiles;
pub mod store;
pub mod viewmodel;
pub mod wizard;

pub use auth::{AuthCoordinator, LoginSession, LoginSessionId};
pub use avatar::AvatarCache;
pub use error::{BackendError, BackendErrorKind, CommandResult};
pub use glyph_core::{
    Account, InstanceSummary, LoginDetails, Profile, ProfileId, Readiness, Theme, WizardStep,
};
pub use instances::InstanceWatcher;
pub use kernel::LauncherKernel;
pub use memo::Memo;
pub use ports::*;
pub use profiles::ProfileStore;
pub use store::{Reduce, Store};
pub use viewmodel::*;
pub use wizard::{OnboardingState, RuntimeSetup, WizardError, WizardErrorKind, WizardNavigator};
