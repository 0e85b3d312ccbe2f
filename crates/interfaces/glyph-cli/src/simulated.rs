//! In-process stand-in for the privileged backend, so the CLI can drive the
//! whole client core without one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use glyph_app_core::{
    BackendError, BackendEvent, BackendGateway, CommandResult, EventChannel, Navigator,
    Subscription,
};
use glyph_config::commands;
use glyph_core::{
    Account, GameDescriptor, InstanceSummary, JavaDescriptor, LoginDetails, Modloader, Profile,
};

const VERIFICATION_URI: &str = "https://www.microsoft.com/link";

type Subscribers = Arc<Mutex<HashMap<EventChannel, Vec<(u64, mpsc::UnboundedSender<BackendEvent>)>>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SimulatedBackend {
    approval_delay: Duration,
    deny_logins: bool,
    profiles: Mutex<Vec<Profile>>,
    instances: Mutex<Vec<InstanceSummary>>,
    subscribers: Subscribers,
    next_subscription: AtomicU64,
    login_cancel: Mutex<Option<CancellationToken>>,
    last_code: Mutex<Option<String>>,
    setup_complete: AtomicBool,
}

impl SimulatedBackend {
    pub fn new(approval_delay: Duration) -> Self {
        Self {
            approval_delay,
            deny_logins: false,
            profiles: Mutex::new(Vec::new()),
            instances: Mutex::new(seed_instances()),
            subscribers: Arc::default(),
            next_subscription: AtomicU64::new(0),
            login_cancel: Mutex::new(None),
            last_code: Mutex::new(None),
            setup_complete: AtomicBool::new(false),
        }
    }

    /// Every device code is rejected once the delay elapses.
    pub fn denying_logins(mut self) -> Self {
        self.deny_logins = true;
        self
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        lock(&self.profiles).push(profile);
        self
    }

    pub fn last_code(&self) -> Option<String> {
        lock(&self.last_code).clone()
    }

    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).values().map(Vec::len).sum()
    }

    /// Adds an instance and notifies watchers, like an install finishing.
    pub fn add_instance(&self, instance: InstanceSummary) {
        lock(&self.instances).push(instance);
        self.emit(EventChannel::InstanceListChanged, BackendEvent::InstanceListChanged);
    }

    fn emit(&self, channel: EventChannel, ev: BackendEvent) {
        let mut subscribers = lock(&self.subscribers);
        if let Some(subs) = subscribers.get_mut(&channel) {
            subs.retain(|(_, tx)| tx.send(ev.clone()).is_ok());
            debug!(%channel, receivers = subs.len(), "Emitted event");
        }
    }

    fn device_code() -> String {
        let raw = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        format!("{}-{}", &raw[..4], &raw[4..8])
    }
}

fn seed_instances() -> Vec<InstanceSummary> {
    let instance = |name: &str, slug: &str, version: &str, loader: &str, loader_version: &str| {
        InstanceSummary {
            name: name.to_string(),
            slug: slug.to_string(),
            game: GameDescriptor {
                version: version.to_string(),
                modloader: Modloader {
                    loader: loader.to_string(),
                    version: loader_version.to_string(),
                },
            },
            java: JavaDescriptor {
                path: "java".to_string(),
                jvm_arguments: vec!["-Xmx4G".to_string()],
            },
        }
    };

    vec![
        instance("Vanilla Survival", "vanilla-survival", "1.21.1", "vanilla", ""),
        instance("Fabric Creative", "fabric-creative", "1.20.4", "fabric", "0.15.7"),
        instance("All the Mods", "all-the-mods", "1.20.1", "forge", "47.2.0"),
    ]
}

#[async_trait]
impl BackendGateway for SimulatedBackend {
    async fn fetch_profiles(&self) -> CommandResult<Vec<Profile>> {
        Ok(lock(&self.profiles).clone())
    }

    async fn fetch_active_account(&self) -> CommandResult<Option<Account>> {
        Ok(lock(&self.profiles).first().map(|p| Account {
            active: true,
            profile: p.clone(),
        }))
    }

    async fn switch_account(&self, profile_id: &str) -> CommandResult<()> {
        let mut profiles = lock(&self.profiles);
        let Some(ix) = profiles.iter().position(|p| p.id == profile_id) else {
            return Err(BackendError::rejected(commands::SWITCH_ACCOUNT, "no such account"));
        };
        let profile = profiles.remove(ix);
        profiles.insert(0, profile);
        Ok(())
    }

    async fn delete_account(&self, profile_id: &str) -> CommandResult<()> {
        let mut profiles = lock(&self.profiles);
        let before = profiles.len();
        profiles.retain(|p| p.id != profile_id);
        if profiles.len() == before {
            return Err(BackendError::rejected(commands::DELETE_ACCOUNT, "no such account"));
        }
        Ok(())
    }

    async fn login(&self) -> CommandResult<Profile> {
        let token = CancellationToken::new();
        *lock(&self.login_cancel) = Some(token.clone());

        let code = Self::device_code();
        *lock(&self.last_code) = Some(code.clone());
        self.emit(
            EventChannel::LoginDetailsReady,
            BackendEvent::LoginDetails(LoginDetails {
                code,
                uri: VERIFICATION_URI.to_string(),
            }),
        );

        tokio::select! {
            _ = token.cancelled() => {
                return Err(BackendError::Cancelled { command: commands::LOGIN });
            }
            _ = tokio::time::sleep(self.approval_delay) => {}
        }

        if self.deny_logins {
            return Err(BackendError::rejected(commands::LOGIN, "the device code was declined"));
        }

        let n = lock(&self.profiles).len() + 1;
        let profile = Profile::new(uuid::Uuid::new_v4().simple().to_string(), format!("Player{n}"));
        lock(&self.profiles).push(profile.clone());
        info!(id = %profile.id, "Simulated login approved");
        Ok(profile)
    }

    async fn cancel_login(&self) -> CommandResult<()> {
        if let Some(token) = lock(&self.login_cancel).take() {
            token.cancel();
        }
        Ok(())
    }

    async fn fetch_instances(&self) -> CommandResult<Vec<InstanceSummary>> {
        Ok(lock(&self.instances).clone())
    }

    async fn mark_setup_complete(&self) -> CommandResult<()> {
        self.setup_complete.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_avatar(&self, profile_id: &str) -> CommandResult<Option<String>> {
        let known = lock(&self.profiles).iter().any(|p| p.id == profile_id);
        Ok(known.then(|| format!("data:image/png;base64,{profile_id}")))
    }

    async fn subscribe(&self, channel: EventChannel) -> CommandResult<Subscription> {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.subscribers).entry(channel).or_default().push((id, tx));

        let subscribers = self.subscribers.clone();
        Ok(Subscription::new(channel, rx, move || {
            if let Some(subs) = lock(&subscribers).get_mut(&channel) {
                subs.retain(|(sid, _)| *sid != id);
            }
        }))
    }
}

/// Navigator for headless runs: a location plus the trail that led there.
#[derive(Debug, Default)]
pub struct ScriptedNavigator {
    location: Mutex<String>,
    trail: Mutex<Vec<String>>,
}

impl ScriptedNavigator {
    pub fn at(location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_string()),
            trail: Mutex::new(Vec::new()),
        }
    }

    pub fn trail(&self) -> Vec<String> {
        lock(&self.trail).clone()
    }
}

impl Navigator for ScriptedNavigator {
    fn location(&self) -> String {
        lock(&self.location).clone()
    }

    fn navigate(&self, location: &str) {
        debug!(%location, "navigate");
        *lock(&self.location) = location.to_string();
        lock(&self.trail).push(location.to_string());
    }
}
