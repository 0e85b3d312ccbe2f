use glyph_core::{InstanceSummary, Profile, ProfileId, Theme, WizardStep};

use crate::auth::LoginSession;
use crate::kernel::LauncherKernel;
use crate::wizard::RuntimeSetup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPopupVm {
    pub visible: bool,
    pub code: String,
    pub verification_uri: String,
}

impl From<LoginSession> for LoginPopupVm {
    fn from(s: LoginSession) -> Self {
        Self {
            visible: s.popup_visible,
            code: s.code,
            verification_uri: s.verification_uri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummaryVm {
    pub id: ProfileId,
    pub name: String,
    pub skin_url: Option<String>,
}

impl From<&Profile> for ProfileSummaryVm {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            skin_url: p
                .skins
                .iter()
                .find(|s| s.state.eq_ignore_ascii_case("active"))
                .or_else(|| p.skins.first())
                .map(|s| s.url.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OnboardingVm {
    /// `None` when the location matches no step.
    pub step: Option<WizardStep>,
    pub step_number: Option<usize>,
    pub step_count: usize,
    pub next_blocked: bool,
    pub can_go_back: bool,
    pub can_finish: bool,
    pub login: LoginPopupVm,
    pub login_in_flight: bool,
    pub profiles: Vec<ProfileSummaryVm>,
    pub selected_profile_id: Option<ProfileId>,
    pub theme: Theme,
    pub runtime: RuntimeSetup,
}

pub fn onboarding_vm(kernel: &LauncherKernel) -> OnboardingVm {
    let step = kernel.wizard.current_step().ok();
    let profiles = kernel.profiles.snapshot();

    OnboardingVm {
        step,
        step_number: step.map(|s| s.index() + 1),
        step_count: WizardStep::ALL.len(),
        next_blocked: kernel.wizard.is_blocked(),
        can_go_back: step.is_some_and(|s| !s.is_first()),
        can_finish: step == Some(WizardStep::Complete),
        login: kernel.auth.session().into(),
        login_in_flight: kernel.auth.is_login_in_flight(),
        profiles: profiles.profiles.iter().map(ProfileSummaryVm::from).collect(),
        selected_profile_id: profiles.selected_id,
        theme: kernel.wizard.theme(),
        runtime: kernel.wizard.runtime_setup(),
    }
}

#[derive(Debug, Clone)]
pub struct SidebarVm {
    pub instances: Vec<InstanceSummary>,
    pub search: String,
    pub profiles: Vec<ProfileSummaryVm>,
    pub selected_profile: Option<ProfileSummaryVm>,
    pub login: LoginPopupVm,
    pub can_logout: bool,
}

pub fn sidebar_vm(kernel: &LauncherKernel) -> SidebarVm {
    let profiles = kernel.profiles.snapshot();
    let selected_profile = kernel.profiles.selected().as_ref().map(ProfileSummaryVm::from);

    SidebarVm {
        instances: kernel.instances.filtered(),
        search: kernel.instances.search(),
        profiles: profiles.profiles.iter().map(ProfileSummaryVm::from).collect(),
        can_logout: selected_profile.is_some(),
        selected_profile,
        login: kernel.auth.session().into(),
    }
}
