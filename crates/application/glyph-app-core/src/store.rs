use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State that evolves by folding events.
pub trait Reduce: Clone {
    type Event;

    /// Events rejected here leave the state untouched.
    fn accepts(&self, _ev: &Self::Event) -> bool {
        true
    }

    fn reduce(self, ev: Self::Event) -> Self;
}

/// Shared state cell. The lock is only ever held for synchronous sections,
/// never across an `.await`.
pub struct Store<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock())
    }

    pub fn with_state_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<S: Clone> Store<S> {
    pub fn state(&self) -> S {
        self.lock().clone()
    }
}

impl<S: Reduce> Store<S> {
    /// Check and fold under a single lock. Returns whether the event was applied.
    pub fn apply(&self, ev: S::Event) -> bool {
        let mut guard = self.lock();
        if !guard.accepts(&ev) {
            return false;
        }
        let next = guard.clone().reduce(ev);
        *guard = next;
        true
    }
}
