//! Background writer: latest-wins persistence for a single key.
//!
//! DESIGN
//! ======
//! Each persisted key gets one task fed by a `watch` channel. The channel
//! holds only the newest submitted value, so a write submitted while an
//! older one is still queued replaces it; an older write already in flight
//! completes first. Writes for a key therefore land in submission order and
//! the durable value converges to the last submission.
//!
//! ERROR HANDLING
//! ==============
//! Failed writes are logged and dropped. No retry: the next submission is
//! the recovery path. `flush` resolves on attempt, success or not.

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::KeyValueStore;

#[derive(Clone, Debug, Default)]
struct Pending {
    generation: u64,
    value: Option<String>,
}

/// Handle for submitting values to a key's background writer.
///
/// Dropping the handle lets the writer drain its last value and exit.
pub struct WriteQueue {
    key: String,
    pending: watch::Sender<Pending>,
    attempted: watch::Receiver<u64>,
}

/// Spawn the background writer for `key`. Must be called inside a Tokio runtime.
#[must_use]
pub fn spawn_writer(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> WriteQueue {
    let key = key.into();
    let (pending_tx, mut pending_rx) = watch::channel(Pending::default());
    let (attempted_tx, attempted_rx) = watch::channel(0_u64);

    let task_key = key.clone();
    tokio::spawn(async move {
        while pending_rx.changed().await.is_ok() {
            let Pending { generation, value } = pending_rx.borrow_and_update().clone();
            if let Some(value) = value {
                match store.set(&task_key, &value).await {
                    Ok(()) => debug!(key = %task_key, generation, "persisted"),
                    Err(e) => warn!(error = %e, key = %task_key, generation, "persist failed; value kept in memory only"),
                }
            }
            attempted_tx.send_replace(generation);
        }
        debug!(key = %task_key, "writer stopped");
    });

    WriteQueue { key, pending: pending_tx, attempted: attempted_rx }
}

impl WriteQueue {
    /// Queue `value` for writing, superseding any value not yet picked up.
    /// Never blocks. Returns the submission's generation number.
    pub fn submit(&self, value: impl Into<String>) -> u64 {
        let value = value.into();
        let mut generation = 0;
        self.pending.send_modify(|pending| {
            pending.generation += 1;
            pending.value = Some(value);
            generation = pending.generation;
        });
        generation
    }

    /// Wait until every submission made so far has been attempted.
    pub async fn flush(&self) {
        let target = self.pending.borrow().generation;
        let mut attempted = self.attempted.clone();
        if attempted.wait_for(|done| *done >= target).await.is_err() {
            warn!(key = %self.key, target, "writer gone before flush completed");
        }
    }

    /// Key this queue writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}
