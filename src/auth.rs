//! Auth-session state for the signed-in learner.
//!
//! SYSTEM CONTEXT
//! ==============
//! The profile screen reads the current user and offers logout; the session
//! survives restarts through the same key-value store as the theme. The
//! persisted form is a versioned envelope, `{"state": {...}, "version": 0}`,
//! so data written by earlier clients hydrates unchanged.
//!
//! ERROR HANDLING
//! ==============
//! Like the theme store: storage trouble is logged, the signed-out default
//! stays, and callers never see an error.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::millis;
use crate::observers::{ObserverList, SubscriptionId};
use crate::storage::{FallbackReason, KeyValueStore, StorageError, WriteQueue, spawn_writer};

pub const AUTH_STORAGE_KEY: &str = "auth-storage";
const ENVELOPE_VERSION: u32 = 0;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Authentication state tracking the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: AuthState,
    #[serde(default)]
    version: u32,
}

/// Failures the auth store logs and swallows.
#[derive(Debug, thiserror::Error)]
pub enum AuthStoreError {
    #[error("auth storage unavailable: {0}")]
    StorageUnavailable(StorageError),

    #[error("auth storage corrupt: {reason}")]
    StorageCorrupt { reason: String },

    #[error("auth storage timed out after {waited_ms}ms")]
    SuspendTimeout { waited_ms: u64 },
}

impl From<StorageError> for AuthStoreError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Corrupt(reason) => Self::StorageCorrupt { reason },
            other => Self::StorageUnavailable(other),
        }
    }
}

impl AuthStoreError {
    #[must_use]
    pub fn reason(&self) -> FallbackReason {
        match self {
            Self::StorageUnavailable(_) => FallbackReason::Unavailable,
            Self::StorageCorrupt { .. } => FallbackReason::Corrupt,
            Self::SuspendTimeout { .. } => FallbackReason::Timeout,
        }
    }
}

/// Result of `AuthStore::hydrate`, for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HydrateOutcome {
    Restored { authenticated: bool },
    Missing,
    Fallback(FallbackReason),
    /// A login or logout happened while the read was outstanding.
    Superseded,
    AlreadyHydrated,
}

// =============================================================================
// STORE
// =============================================================================

struct Slot {
    current: AuthState,
    /// Bumped by every login/logout; lets `hydrate` detect a newer session.
    revision: u64,
}

struct Inner {
    state: RwLock<Slot>,
    observers: ObserverList<AuthState>,
    storage: Arc<dyn KeyValueStore>,
    writer: WriteQueue,
    hydrate_timeout: Duration,
    hydrated: AtomicBool,
}

/// Shared handle to the persisted auth session.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl AuthStore {
    /// Build a signed-out store. Must run inside a Tokio runtime.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, hydrate_timeout: Duration) -> Self {
        let writer = spawn_writer(storage.clone(), AUTH_STORAGE_KEY);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Slot { current: AuthState::default(), revision: 0 }),
                observers: ObserverList::new(),
                storage,
                writer,
                hydrate_timeout,
                hydrated: AtomicBool::new(false),
            }),
        }
    }

    /// Restore the persisted session. Never fails; see `HydrateOutcome`.
    pub async fn hydrate(&self) -> HydrateOutcome {
        if self.inner.hydrated.swap(true, Ordering::SeqCst) {
            warn!("auth store already hydrated; ignoring");
            return HydrateOutcome::AlreadyHydrated;
        }

        let started_at = self.read_state().revision;
        let restored = match self.read_persisted().await {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("no persisted auth session");
                return HydrateOutcome::Missing;
            }
            Err(e) => {
                warn!(error = %e, key = AUTH_STORAGE_KEY, "auth session load failed; starting signed out");
                return HydrateOutcome::Fallback(e.reason());
            }
        };

        let changed = {
            let mut slot = self.write_state();
            if slot.revision != started_at {
                info!("persisted auth session superseded by newer login/logout");
                return HydrateOutcome::Superseded;
            }
            if slot.current == restored {
                false
            } else {
                slot.current = restored.clone();
                true
            }
        };

        let authenticated = restored.is_authenticated;
        info!(authenticated, "auth session restored");
        if changed {
            self.inner.observers.notify(&restored);
        }
        HydrateOutcome::Restored { authenticated }
    }

    async fn read_persisted(&self) -> Result<Option<AuthState>, AuthStoreError> {
        let timeout = self.inner.hydrate_timeout;
        let raw = tokio::time::timeout(timeout, self.inner.storage.get(AUTH_STORAGE_KEY))
            .await
            .map_err(|_| AuthStoreError::SuspendTimeout { waited_ms: millis(timeout) })??;

        let Some(raw) = raw else {
            return Ok(None);
        };
        let envelope: Envelope =
            serde_json::from_str(&raw).map_err(|e| AuthStoreError::StorageCorrupt { reason: e.to_string() })?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(AuthStoreError::StorageCorrupt {
                reason: format!("unsupported envelope version {}", envelope.version),
            });
        }
        // EDGE: an authenticated flag without a user cannot be rendered.
        if envelope.state.is_authenticated && envelope.state.user.is_none() {
            return Err(AuthStoreError::StorageCorrupt { reason: "authenticated without a user".into() });
        }
        Ok(Some(envelope.state))
    }

    /// Sign `user` in, notify observers, and persist in the background.
    pub fn login(&self, user: User) {
        info!(user_id = %user.id, "login");
        self.replace(AuthState { user: Some(user), is_authenticated: true });
    }

    /// Sign out, notify observers, and persist in the background.
    pub fn logout(&self) {
        info!("logout");
        self.replace(AuthState::default());
    }

    fn replace(&self, next: AuthState) {
        {
            let mut slot = self.write_state();
            slot.current = next.clone();
            slot.revision += 1;
        }

        match serde_json::to_string(&Envelope { state: next.clone(), version: ENVELOPE_VERSION }) {
            Ok(json) => {
                self.inner.writer.submit(json);
            }
            Err(e) => warn!(error = %e, "auth session encode failed; not persisted"),
        }

        self.inner.observers.notify(&next);
    }

    /// Wait until every write scheduled so far has been attempted.
    pub async fn flush(&self) {
        self.inner.writer.flush().await;
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.read_state().current.clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.read_state().current.user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state().current.is_authenticated
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Slot> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Slot> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
