use serde::{Deserialize, Serialize};

pub mod instance;
pub mod selection;
pub mod wizard;

pub use instance::{filter_instances, GameDescriptor, InstanceSummary, JavaDescriptor, Modloader};
pub use selection::resolve_selection;
pub use wizard::{is_blocked, Readiness, Theme, UnknownLocation, WizardStep};

pub type ProfileId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skin {
    pub id: String,
    pub state: String,
    pub url: String,
    pub variant: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cape {
    pub id: String,
    pub state: String,
    pub url: String,
    pub alias: String,
}

/// A game identity as reported by the backend. Never patched in place; a
/// refresh replaces the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub skins: Vec<Skin>,
    #[serde(default)]
    pub capes: Vec<Cape>,
}

impl Profile {
    pub fn new(id: impl Into<ProfileId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skins: Vec::new(),
            capes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub active: bool,
    pub profile: Profile,
}

/// Payload of the device-authorization "details ready" event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LoginDetails {
    pub code: String,
    pub uri: String,
}
