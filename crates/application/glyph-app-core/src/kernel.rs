use std::sync::Arc;

use anyhow::Context;

use crate::auth::AuthCoordinator;
use crate::avatar::AvatarCache;
use crate::instances::InstanceWatcher;
use crate::ports::{BackendGateway, Navigator};
use crate::profiles::ProfileStore;
use crate::wizard::WizardNavigator;

/// Composition root: one instance of every service, all sharing the injected
/// backend and navigator.
pub struct LauncherKernel {
    pub auth: Arc<AuthCoordinator>,
    pub profiles: Arc<ProfileStore>,
    pub wizard: WizardNavigator,
    pub instances: InstanceWatcher,
    pub avatars: AvatarCache,
}

impl LauncherKernel {
    pub fn new(gateway: Arc<dyn BackendGateway>, navigator: Arc<dyn Navigator>) -> Self {
        let auth = Arc::new(AuthCoordinator::new(gateway.clone()));
        let profiles = Arc::new(ProfileStore::new(gateway.clone(), auth.clone()));
        let wizard = WizardNavigator::new(gateway.clone(), navigator, profiles.clone());
        let instances = InstanceWatcher::new(gateway.clone());
        let avatars = AvatarCache::new(gateway);

        Self {
            auth,
            profiles,
            wizard,
            instances,
            avatars,
        }
    }

    /// What the onboarding view needs before its first render.
    pub async fn start_onboarding(&self) -> anyhow::Result<()> {
        self.auth
            .init()
            .await
            .context("Failed to listen for login details")?;
        self.profiles.refresh().await;
        tracing::info!("Onboarding services started");
        Ok(())
    }

    /// What the launcher view needs: onboarding services plus the instance
    /// watcher.
    pub async fn start_launcher(&self) -> anyhow::Result<()> {
        self.start_onboarding().await?;
        self.instances
            .start()
            .await
            .context("Failed to watch the instance list")?;
        tracing::info!("Launcher services started");
        Ok(())
    }

    pub fn shutdown(&self) {
        self.instances.shutdown();
        self.auth.shutdown();
    }
}

impl Drop for LauncherKernel {
    fn drop(&mut self) {
        self.shutdown();
    }
}
