use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use glyph_config::commands;
use glyph_core::{resolve_selection, Account, Profile, ProfileId};

use crate::auth::AuthCoordinator;
use crate::error::BackendError;
use crate::ports::BackendGateway;
use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct ProfilesState {
    pub profiles: Vec<Profile>,
    pub selected_id: Option<ProfileId>,
    applied_revision: u64,
}

/// Cache of authenticated profiles plus the current selection.
pub struct ProfileStore {
    gateway: Arc<dyn BackendGateway>,
    auth: Arc<AuthCoordinator>,
    store: Store<ProfilesState>,
    revisions: AtomicU64,
}

impl ProfileStore {
    pub fn new(gateway: Arc<dyn BackendGateway>, auth: Arc<AuthCoordinator>) -> Self {
        Self {
            gateway,
            auth,
            store: Store::default(),
            revisions: AtomicU64::new(0),
        }
    }

    /// Replaces the collection with the backend's and re-applies the
    /// selection rule. A failed fetch leaves an empty collection.
    pub async fn refresh(&self) {
        self.refresh_with_hint(None).await;
    }

    async fn refresh_with_hint(&self, hint: Option<&str>) {
        let revision = self.revisions.fetch_add(1, Ordering::SeqCst) + 1;

        let profiles = match self.gateway.fetch_profiles().await {
            Ok(p) => p,
            Err(e) => {
                error!(command = commands::FETCH_PROFILES, "Failed to fetch profiles: {e}");
                Vec::new()
            }
        };

        self.store.with_state_mut(|state| {
            if revision < state.applied_revision {
                debug!(revision, "Dropping superseded profile refresh");
                return;
            }
            state.applied_revision = revision;
            state.selected_id = resolve_selection(&profiles, state.selected_id.as_deref(), hint);
            state.profiles = profiles;
        });
    }

    /// Device login followed by a refresh that prefers the new profile.
    /// Returns the resulting selection, or `None` if the login failed.
    pub async fn login(&self) -> Option<Profile> {
        let profile = self.auth.start_login().await?;
        self.refresh_with_hint(Some(&profile.id)).await;
        self.selected()
    }

    /// Deletes the selected account, then refreshes.
    pub async fn logout(&self) -> Result<(), BackendError> {
        let Some(id) = self.selected_id() else {
            warn!("No profile selected to logout");
            return Ok(());
        };

        if let Err(e) = self.gateway.delete_account(&id).await {
            error!(command = commands::DELETE_ACCOUNT, %id, "Logout failed: {e}");
            return Err(e);
        }
        info!(%id, "Account deleted");

        self.refresh().await;
        Ok(())
    }

    /// Local selection change. Unknown ids are ignored.
    pub fn select(&self, id: &str) -> bool {
        self.store.with_state_mut(|state| {
            if state.profiles.iter().any(|p| p.id == id) {
                state.selected_id = Some(id.to_string());
                true
            } else {
                warn!(%id, "Cannot select unknown profile");
                false
            }
        })
    }

    pub async fn switch_account(&self, id: &str) -> Result<(), BackendError> {
        if let Err(e) = self.gateway.switch_account(id).await {
            error!(command = commands::SWITCH_ACCOUNT, %id, "Failed to switch account: {e}");
            return Err(e);
        }
        info!(%id, "Switched account");
        self.select(id);
        Ok(())
    }

    pub async fn active_account(&self) -> Option<Account> {
        match self.gateway.fetch_active_account().await {
            Ok(account) => account,
            Err(e) => {
                error!(command = commands::FETCH_ACTIVE_ACCOUNT, "Failed to fetch active account: {e}");
                None
            }
        }
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.store.read(|s| s.profiles.clone())
    }

    pub fn has_profiles(&self) -> bool {
        self.store.read(|s| !s.profiles.is_empty())
    }

    pub fn selected_id(&self) -> Option<ProfileId> {
        self.store.read(|s| s.selected_id.clone())
    }

    pub fn selected(&self) -> Option<Profile> {
        self.store.read(|s| {
            s.selected_id
                .as_ref()
                .and_then(|id| s.profiles.iter().find(|p| &p.id == id))
                .cloned()
        })
    }

    pub fn snapshot(&self) -> ProfilesState {
        self.store.state()
    }
}
