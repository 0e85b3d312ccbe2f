use std::future::Future;

use tokio_util::sync::{CancellationToken, DropGuard};

use crate::ports::{BackendEvent, Subscription};

/// Keeps a listener task alive. Dropping it stops the task, which in turn
/// drops the subscription and runs its release callback.
#[derive(Debug)]
pub(crate) struct ListenerGuard {
    _cancel: DropGuard,
}

/// Deliveries are handled one at a time, in arrival order.
pub(crate) fn spawn_listener<F, Fut>(mut subscription: Subscription, mut on_event: F) -> ListenerGuard
where
    F: FnMut(BackendEvent) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let channel = subscription.channel();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancelled.cancelled() => break,
                ev = subscription.recv() => match ev {
                    Some(ev) => on_event(ev).await,
                    None => {
                        tracing::debug!(%channel, "backend closed event channel");
                        break;
                    }
                }
            }
        }
        tracing::debug!(%channel, "listener stopped");
    });

    ListenerGuard {
        _cancel: token.drop_guard(),
    }
}
