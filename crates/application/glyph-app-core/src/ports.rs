use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use glyph_config::{INSTANCE_LIST_CHANGED_EVENT, LOGIN_DETAILS_EVENT};
use glyph_core::{Account, InstanceSummary, LoginDetails, Profile};

use crate::error::CommandResult;

/// Command and event surface of the privileged backend process.
///
/// Every command resolves exactly once. `login` is long-lived: it resolves
/// only after the user approved (or denied) the device code elsewhere.
#[async_trait]
pub trait BackendGateway: Send + Sync + 'static {
    async fn fetch_profiles(&self) -> CommandResult<Vec<Profile>>;
    async fn fetch_active_account(&self) -> CommandResult<Option<Account>>;
    async fn switch_account(&self, profile_id: &str) -> CommandResult<()>;
    async fn delete_account(&self, profile_id: &str) -> CommandResult<()>;
    async fn login(&self) -> CommandResult<Profile>;
    async fn cancel_login(&self) -> CommandResult<()>;
    async fn fetch_instances(&self) -> CommandResult<Vec<InstanceSummary>>;
    async fn mark_setup_complete(&self) -> CommandResult<()>;
    async fn fetch_avatar(&self, profile_id: &str) -> CommandResult<Option<String>>;

    async fn subscribe(&self, channel: EventChannel) -> CommandResult<Subscription>;
}

/// Where the UI currently is, and how to move it.
pub trait Navigator: Send + Sync + 'static {
    fn location(&self) -> String;
    fn navigate(&self, location: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    LoginDetailsReady,
    InstanceListChanged,
}

impl EventChannel {
    pub fn name(self) -> &'static str {
        match self {
            EventChannel::LoginDetailsReady => LOGIN_DETAILS_EVENT,
            EventChannel::InstanceListChanged => INSTANCE_LIST_CHANGED_EVENT,
        }
    }
}

impl fmt::Display for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    LoginDetails(LoginDetails),
    InstanceListChanged,
}

/// A live event subscription. The release callback runs exactly once, when
/// the subscription is dropped.
pub struct Subscription {
    channel: EventChannel,
    events: mpsc::UnboundedReceiver<BackendEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(
        channel: EventChannel,
        events: mpsc::UnboundedReceiver<BackendEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            channel,
            events,
            release: Some(Box::new(release)),
        }
    }

    pub fn channel(&self) -> EventChannel {
        self.channel
    }

    /// `None` once the backend closed the channel.
    pub async fn recv(&mut self) -> Option<BackendEvent> {
        self.events.recv().await
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("released", &self.release.is_none())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
