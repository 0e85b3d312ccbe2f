use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info};

use glyph_config::commands;
use glyph_core::{filter_instances, InstanceSummary};

use crate::error::BackendError;
use crate::listener::{spawn_listener, ListenerGuard};
use crate::memo::Memo;
use crate::ports::{BackendEvent, BackendGateway, EventChannel};
use crate::store::Store;

#[derive(Debug, Clone, Default)]
struct InstancesState {
    instances: Vec<InstanceSummary>,
    search: String,
    /// Ticket of the fetch that produced `instances`.
    revision: u64,
}

struct Inner {
    gateway: Arc<dyn BackendGateway>,
    store: Store<InstancesState>,
    tickets: AtomicU64,
}

impl Inner {
    async fn refresh(&self) {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;

        let instances = match self.gateway.fetch_instances().await {
            Ok(v) => v,
            Err(e) => {
                error!(command = commands::FETCH_INSTANCES, "Failed to fetch instances: {e}");
                Vec::new()
            }
        };

        self.store.with_state_mut(|state| {
            if ticket < state.revision {
                debug!(ticket, "Dropping superseded instance fetch");
                return;
            }
            state.revision = ticket;
            state.instances = instances;
        });
    }
}

/// Locally searchable cache of game instances, kept current by the backend's
/// "instance list changed" notifications while started.
pub struct InstanceWatcher {
    inner: Arc<Inner>,
    filtered: Mutex<Memo<(u64, String), Vec<InstanceSummary>>>,
    listener: Mutex<Option<ListenerGuard>>,
}

impl InstanceWatcher {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                store: Store::default(),
                tickets: AtomicU64::new(0),
            }),
            filtered: Mutex::new(Memo::new()),
            listener: Mutex::new(None),
        }
    }

    /// Initial fetch, then subscribe once. Calling again only refreshes.
    pub async fn start(&self) -> Result<(), BackendError> {
        self.refresh().await;

        if self.is_watching() {
            return Ok(());
        }

        let subscription = match self
            .inner
            .gateway
            .subscribe(EventChannel::InstanceListChanged)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                error!(channel = %EventChannel::InstanceListChanged, "Failed to subscribe: {e}");
                return Err(e);
            }
        };

        let inner = self.inner.clone();
        let guard = spawn_listener(subscription, move |ev| {
            let inner = inner.clone();
            async move {
                if ev == BackendEvent::InstanceListChanged {
                    inner.refresh().await;
                }
            }
        });

        let mut slot = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(guard);
            info!("Watching instance list");
        }
        Ok(())
    }

    /// Stops watching. The subscription is released once the listener exits.
    pub fn shutdown(&self) {
        if self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            info!("Stopped watching instance list");
        }
    }

    pub fn is_watching(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub async fn refresh(&self) {
        self.inner.refresh().await;
    }

    pub fn instances(&self) -> Vec<InstanceSummary> {
        self.inner.store.read(|s| s.instances.clone())
    }

    pub fn instance(&self, slug: &str) -> Option<InstanceSummary> {
        self.inner
            .store
            .read(|s| s.instances.iter().find(|i| i.slug == slug).cloned())
    }

    pub fn search(&self) -> String {
        self.inner.store.read(|s| s.search.clone())
    }

    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.store.with_state_mut(|s| s.search = text);
    }

    /// Instances whose name contains the search text, ignoring case.
    /// Recomputed only when the collection or the search text changed.
    pub fn filtered(&self) -> Vec<InstanceSummary> {
        let mut memo = self.filtered.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.store.read(|s| {
            memo.get_or_compute((s.revision, s.search.clone()), || {
                filter_instances(&s.instances, &s.search)
            })
        })
    }
}
