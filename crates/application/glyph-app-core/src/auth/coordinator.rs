use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, error, info, warn};

use glyph_config::commands;
use glyph_core::Profile;

use crate::error::{BackendError, BackendErrorKind};
use crate::listener::{spawn_listener, ListenerGuard};
use crate::ports::{BackendEvent, BackendGateway, EventChannel};
use crate::store::Store;

use super::events::LoginEvent;
use super::reducer::{AuthState, LoginSession, LoginSessionId};

type PendingLogin = Shared<BoxFuture<'static, Option<Profile>>>;

/// Owns the device-authorization session: the "details ready" subscription,
/// the in-flight login command and the popup fields derived from both.
pub struct AuthCoordinator {
    gateway: Arc<dyn BackendGateway>,
    store: Store<AuthState>,
    initialized: AtomicBool,
    /// Held across subscription setup so concurrent `init` calls wait for it.
    setup: tokio::sync::Mutex<()>,
    listener: Mutex<Option<ListenerGuard>>,
    pending: Mutex<Option<(LoginSessionId, PendingLogin)>>,
}

impl AuthCoordinator {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            store: Store::default(),
            initialized: AtomicBool::new(false),
            setup: tokio::sync::Mutex::new(()),
            listener: Mutex::new(None),
            pending: Mutex::new(None),
        }
    }

    /// Opens the login-details subscription on the first call. Calls made
    /// while that is in progress wait for it; later calls are no-ops, including
    /// after a failed first attempt.
    pub async fn init(&self) -> Result<(), BackendError> {
        if self.is_initialized() {
            return Ok(());
        }

        let _setup = self.setup.lock().await;
        if self.is_initialized() {
            return Ok(());
        }

        // The flag is only raised once setup finished, so no caller can issue
        // a login before the details subscriber exists.
        let subscription = match self.gateway.subscribe(EventChannel::LoginDetailsReady).await {
            Ok(s) => s,
            Err(e) => {
                error!(channel = %EventChannel::LoginDetailsReady, "Failed to subscribe: {e}");
                self.initialized.store(true, Ordering::SeqCst);
                return Err(e);
            }
        };

        let store = self.store.clone();
        let guard = spawn_listener(subscription, move |ev| {
            if let BackendEvent::LoginDetails(details) = ev {
                if !store.apply(LoginEvent::DetailsReceived(details)) {
                    debug!("Discarding login details: no login session is live");
                }
            }
            futures::future::ready(())
        });
        *self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(guard);
        self.initialized.store(true, Ordering::SeqCst);

        info!("Auth coordinator initialized");
        Ok(())
    }

    /// Runs a device login and yields the authenticated profile, or `None` on
    /// any failure. Calls made while a session is in flight share its outcome.
    pub async fn start_login(&self) -> Option<Profile> {
        if let Err(e) = self.init().await {
            error!("Login process failed: {e}");
            return None;
        }

        self.pending_or_start().await
    }

    fn pending_or_start(&self) -> PendingLogin {
        let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((session, pending)) = slot.as_ref() {
            if self.store.read(|s| s.live == Some(*session)) {
                debug!(%session, "Login already in flight, joining it");
                return pending.clone();
            }
        }

        let session: LoginSessionId = uuid::Uuid::new_v4();
        self.store.apply(LoginEvent::Started { session });
        info!(%session, "Starting device login");

        let gateway = self.gateway.clone();
        let store = self.store.clone();
        let pending = async move {
            let outcome = gateway.login().await;

            if !store.apply(LoginEvent::Resolved { session }) {
                debug!(%session, "Login resolved after its session was detached");
            }

            match outcome {
                Ok(profile) => {
                    info!(%session, id = %profile.id, "Login succeeded");
                    Some(profile)
                }
                Err(e) if e.kind() == BackendErrorKind::Cancelled => {
                    info!(%session, "Login cancelled");
                    None
                }
                Err(e) => {
                    error!(%session, command = commands::LOGIN, "Login process failed: {e}");
                    None
                }
            }
        }
        .boxed()
        .shared();

        *slot = Some((session, pending.clone()));
        pending
    }

    /// Hides the popup immediately and detaches the live session, then asks
    /// the backend to abort. A failed abort is logged only; the popup stays
    /// hidden.
    pub async fn cancel_login_popup(&self) {
        self.store.apply(LoginEvent::Cancelled);

        match self.gateway.cancel_login().await {
            Ok(()) => info!("Login flow cancelled"),
            Err(e) => warn!(command = commands::CANCEL_LOGIN, "Failed to cancel login: {e}"),
        }
    }

    /// Releases the subscription and resets the session to idle. `init` may
    /// be called again afterwards.
    pub fn shutdown(&self) {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.store.apply(LoginEvent::Reset);
        self.initialized.store(false, Ordering::SeqCst);
        info!("Auth coordinator shut down");
    }

    pub fn session(&self) -> LoginSession {
        self.store.read(|s| s.session.clone())
    }

    pub fn popup_visible(&self) -> bool {
        self.store.read(|s| s.session.popup_visible)
    }

    pub fn is_login_in_flight(&self) -> bool {
        self.store.read(|s| s.live.is_some())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}
