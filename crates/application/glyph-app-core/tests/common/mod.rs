#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use glyph_app_core::{
    BackendError, BackendEvent, BackendGateway, CommandResult, EventChannel, Navigator,
    Subscription,
};
use glyph_core::{Account, InstanceSummary, LoginDetails, Profile};

type Subscribers = Arc<Mutex<HashMap<EventChannel, Vec<(usize, mpsc::UnboundedSender<BackendEvent>)>>>>;

/// Scripted backend. `login` parks until the test resolves it.
#[derive(Default)]
pub struct FakeBackend {
    pub profiles: Mutex<Vec<Profile>>,
    pub instances: Mutex<Vec<InstanceSummary>>,
    pub avatar: Mutex<Option<String>>,

    pub fail_profiles: Mutex<Option<BackendError>>,
    pub fail_instances: Mutex<Option<BackendError>>,
    pub fail_subscribe: Mutex<Option<BackendError>>,
    pub fail_cancel: Mutex<Option<BackendError>>,
    pub fail_delete: Mutex<Option<BackendError>>,
    pub fail_switch: Mutex<Option<BackendError>>,
    pub fail_mark_complete: Mutex<Option<BackendError>>,
    pub fail_avatar: Mutex<Option<BackendError>>,

    /// `subscribe` gives up the thread once before registering.
    pub slow_subscribe: AtomicBool,
    /// Emitted the moment `login` is called, before it parks.
    pub details_on_login: Mutex<Option<LoginDetails>>,

    calls: Mutex<Vec<String>>,
    pending_login: Mutex<Option<oneshot::Sender<CommandResult<Profile>>>>,
    subscribers: Subscribers,
    next_subscription: AtomicUsize,
    live_subscriptions: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_profiles(ids: &[&str]) -> Arc<Self> {
        let backend = Self::new();
        backend.set_profiles(ids);
        backend
    }

    pub fn set_profiles(&self, ids: &[&str]) {
        *self.profiles.lock().unwrap() = profiles(ids);
    }

    pub fn set_instances(&self, names: &[&str]) {
        *self.instances.lock().unwrap() = names
            .iter()
            .map(|n| InstanceSummary::new(*n, n.to_lowercase()))
            .collect();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == command).count()
    }

    fn record(&self, command: &str) {
        self.calls.lock().unwrap().push(command.to_string());
    }

    pub fn login_pending(&self) -> bool {
        self.pending_login.lock().unwrap().is_some()
    }

    /// Completes the parked `login` call. Returns false if none is parked.
    pub fn resolve_login(&self, outcome: CommandResult<Profile>) -> bool {
        match self.pending_login.lock().unwrap().take() {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    pub fn emit(&self, channel: EventChannel, ev: BackendEvent) {
        if let Some(subs) = self.subscribers.lock().unwrap().get_mut(&channel) {
            subs.retain(|(_, tx)| tx.send(ev.clone()).is_ok());
        }
    }

    pub fn emit_login_details(&self, code: &str, uri: &str) {
        self.emit(
            EventChannel::LoginDetailsReady,
            BackendEvent::LoginDetails(LoginDetails {
                code: code.into(),
                uri: uri.into(),
            }),
        );
    }

    pub fn emit_instance_list_changed(&self) {
        self.emit(
            EventChannel::InstanceListChanged,
            BackendEvent::InstanceListChanged,
        );
    }

    pub fn live_subscriptions(&self) -> usize {
        self.live_subscriptions.load(Ordering::SeqCst)
    }

    fn fail(slot: &Mutex<Option<BackendError>>) -> CommandResult<()> {
        match slot.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BackendGateway for FakeBackend {
    async fn fetch_profiles(&self) -> CommandResult<Vec<Profile>> {
        self.record("fetch_profiles");
        Self::fail(&self.fail_profiles)?;
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn fetch_active_account(&self) -> CommandResult<Option<Account>> {
        self.record("fetch_active_account");
        Ok(self.profiles.lock().unwrap().first().map(|p| Account {
            active: true,
            profile: p.clone(),
        }))
    }

    async fn switch_account(&self, profile_id: &str) -> CommandResult<()> {
        self.record(&format!("switch_account:{profile_id}"));
        Self::fail(&self.fail_switch)
    }

    async fn delete_account(&self, profile_id: &str) -> CommandResult<()> {
        self.record(&format!("delete_account:{profile_id}"));
        Self::fail(&self.fail_delete)?;
        self.profiles.lock().unwrap().retain(|p| p.id != profile_id);
        Ok(())
    }

    async fn login(&self) -> CommandResult<Profile> {
        self.record("login");
        let (tx, rx) = oneshot::channel();
        *self.pending_login.lock().unwrap() = Some(tx);
        let details = self.details_on_login.lock().unwrap().clone();
        if let Some(details) = details {
            self.emit(EventChannel::LoginDetailsReady, BackendEvent::LoginDetails(details));
        }
        rx.await
            .unwrap_or(Err(BackendError::Cancelled { command: "login" }))
    }

    async fn cancel_login(&self) -> CommandResult<()> {
        self.record("cancel_login");
        Self::fail(&self.fail_cancel)
    }

    async fn fetch_instances(&self) -> CommandResult<Vec<InstanceSummary>> {
        self.record("fetch_instances");
        Self::fail(&self.fail_instances)?;
        Ok(self.instances.lock().unwrap().clone())
    }

    async fn mark_setup_complete(&self) -> CommandResult<()> {
        self.record("mark_setup_complete");
        Self::fail(&self.fail_mark_complete)
    }

    async fn fetch_avatar(&self, profile_id: &str) -> CommandResult<Option<String>> {
        self.record(&format!("fetch_avatar:{profile_id}"));
        Self::fail(&self.fail_avatar)?;
        Ok(self.avatar.lock().unwrap().clone())
    }

    async fn subscribe(&self, channel: EventChannel) -> CommandResult<Subscription> {
        self.record(&format!("subscribe:{channel}"));
        if self.slow_subscribe.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        Self::fail(&self.fail_subscribe)?;

        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap()
            .entry(channel)
            .or_default()
            .push((id, tx));
        self.live_subscriptions.fetch_add(1, Ordering::SeqCst);

        let subscribers = self.subscribers.clone();
        let live = self.live_subscriptions.clone();
        Ok(Subscription::new(channel, rx, move || {
            if let Some(subs) = subscribers.lock().unwrap().get_mut(&channel) {
                subs.retain(|(sid, _)| *sid != id);
            }
            live.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}

/// Navigator that just remembers where it was sent.
pub struct FakeNavigator {
    location: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl FakeNavigator {
    pub fn at(location: &str) -> Arc<Self> {
        Arc::new(Self {
            location: Mutex::new(location.to_string()),
            history: Mutex::new(Vec::new()),
        })
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }
}

impl Navigator for FakeNavigator {
    fn location(&self) -> String {
        self.location.lock().unwrap().clone()
    }

    fn navigate(&self, location: &str) {
        *self.location.lock().unwrap() = location.to_string();
        self.history.lock().unwrap().push(location.to_string());
    }
}

pub fn profiles(ids: &[&str]) -> Vec<Profile> {
    ids.iter()
        .map(|id| Profile::new(*id, format!("Player {id}")))
        .collect()
}

pub fn rejected(command: &'static str) -> BackendError {
    BackendError::rejected(command, "scripted failure")
}

/// Lets spawned listener tasks drain their queues.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Yields until `cond` holds, panicking after a bounded number of rounds.
pub async fn settle_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
