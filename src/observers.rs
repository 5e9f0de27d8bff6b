//! Synchronous observer registry shared by the stateful stores.
//!
//! DESIGN
//! ======
//! Observers are plain callbacks keyed by a `SubscriptionId`. `notify`
//! clones the callback list under the lock and invokes them after releasing
//! it, so an observer may read the store or (un)subscribe from inside its
//! callback without deadlocking. No ordering between observers is promised.

#[cfg(test)]
#[path = "observers_test.rs"]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub(crate) struct ObserverList<T> {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> ObserverList<T> {
    pub(crate) fn new() -> Self {
        Self { next_id: AtomicU64::new(1), callbacks: Mutex::new(Vec::new()) }
    }

    pub(crate) fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner).push((id, Arc::new(callback)));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(PoisonError::into_inner);
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub(crate) fn notify(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in snapshot {
            cb(value);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
