//! `ThemeStore`: single source of truth for the theme preference.
//!
//! DESIGN
//! ======
//! One store per application, built by the composition root and handed to
//! consumers as a cheap clone. State sits behind a `std` lock that is never
//! held across an await or while observers run, so reads and `set_preference`
//! are synchronous. Persistence goes through a latest-wins `WriteQueue`.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures of any kind are logged and swallowed. The store always
//! holds a valid preference: the default, or the last one set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Appearance, DEFAULT_THEME_KEY, ThemePreference, ThemeStoreError};
use crate::config::millis;
use crate::observers::{ObserverList, SubscriptionId};
use crate::scheme::HostColorScheme;
use crate::storage::{FallbackReason, KeyValueStore, WriteQueue, spawn_writer};

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Result of `ThemeStore::initialize`, for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// A valid preference was read and is now current.
    Loaded(ThemePreference),
    /// Nothing was persisted; the default stays.
    Missing,
    /// Read failed, was corrupt, or timed out; the default stays.
    Fallback(FallbackReason),
    /// The user set a preference while the read was outstanding.
    Superseded,
    /// `initialize` already ran once.
    AlreadyInitialized,
}

impl ThemeStoreError {
    #[must_use]
    pub fn reason(&self) -> FallbackReason {
        match self {
            Self::StorageUnavailable(_) => FallbackReason::Unavailable,
            Self::StorageCorrupt { .. } => FallbackReason::Corrupt,
            Self::SuspendTimeout { .. } => FallbackReason::Timeout,
        }
    }
}

/// Tuning for a `ThemeStore`.
#[derive(Clone, Debug)]
pub struct ThemeStoreConfig {
    /// Storage key holding the preference.
    pub key: String,
    /// Upper bound on the initial storage read.
    pub init_timeout: Duration,
}

impl Default for ThemeStoreConfig {
    fn default() -> Self {
        Self { key: DEFAULT_THEME_KEY.to_string(), init_timeout: DEFAULT_INIT_TIMEOUT }
    }
}

#[derive(Debug)]
struct State {
    preference: ThemePreference,
    host: HostColorScheme,
    /// Bumped by every `set_preference`; lets `initialize` detect a newer choice.
    revision: u64,
}

struct Inner {
    state: RwLock<State>,
    observers: ObserverList<Appearance>,
    storage: Arc<dyn KeyValueStore>,
    writer: WriteQueue,
    config: ThemeStoreConfig,
    initialized: AtomicBool,
}

/// Shared handle to the theme preference store.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Arc<Inner>,
}

impl ThemeStore {
    /// Build the store with the default preference (`System`) and the given
    /// initial host scheme. Spawns the background writer, so this must run
    /// inside a Tokio runtime.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, host: HostColorScheme, config: ThemeStoreConfig) -> Self {
        let writer = spawn_writer(storage.clone(), config.key.clone());
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(State { preference: ThemePreference::default(), host, revision: 0 }),
                observers: ObserverList::new(),
                storage,
                writer,
                config,
                initialized: AtomicBool::new(false),
            }),
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Load the persisted preference. Call once, before first render.
    ///
    /// Never fails: missing, corrupt, unreadable or slow storage leaves the
    /// current value in place and is only logged.
    pub async fn initialize(&self) -> InitOutcome {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            warn!(key = %self.inner.config.key, "theme store already initialized; ignoring");
            return InitOutcome::AlreadyInitialized;
        }

        let started_at = self.read_state().revision;
        let loaded = match self.read_persisted().await {
            Ok(Some(preference)) => preference,
            Ok(None) => {
                debug!(key = %self.inner.config.key, "no persisted theme; using default");
                return InitOutcome::Missing;
            }
            Err(e) => {
                warn!(error = %e, key = %self.inner.config.key, "theme load failed; using default");
                return InitOutcome::Fallback(e.reason());
            }
        };

        let appearance = {
            let mut state = self.write_state();
            // EDGE: a set_preference during the read is newer than what we loaded.
            if state.revision != started_at {
                info!(loaded = %loaded, current = %state.preference, "persisted theme superseded by user choice");
                return InitOutcome::Superseded;
            }
            if state.preference == loaded {
                None
            } else {
                state.preference = loaded;
                Some(Appearance::new(loaded, state.host))
            }
        };

        info!(preference = %loaded, "theme preference restored");
        if let Some(appearance) = appearance {
            self.inner.observers.notify(&appearance);
        }
        InitOutcome::Loaded(loaded)
    }

    async fn read_persisted(&self) -> Result<Option<ThemePreference>, ThemeStoreError> {
        let timeout = self.inner.config.init_timeout;
        let raw = tokio::time::timeout(timeout, self.inner.storage.get(&self.inner.config.key))
            .await
            .map_err(|_| ThemeStoreError::SuspendTimeout { waited_ms: millis(timeout) })??;

        match raw {
            None => Ok(None),
            Some(raw) => match raw.parse::<ThemePreference>() {
                Ok(preference) => Ok(Some(preference)),
                Err(e) => Err(ThemeStoreError::StorageCorrupt { value: e.to_string() }),
            },
        }
    }

    /// Wait until every write scheduled so far has been attempted.
    pub async fn flush(&self) {
        self.inner.writer.flush().await;
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Make `preference` current and schedule it for persistence.
    ///
    /// Memory is updated and observers notified (if the value changed)
    /// before this returns; the write happens later and may fail silently.
    pub fn set_preference(&self, preference: ThemePreference) {
        let changed = {
            let mut state = self.write_state();
            state.revision += 1;
            if state.preference == preference {
                None
            } else {
                state.preference = preference;
                Some(Appearance::new(preference, state.host))
            }
        };

        self.inner.writer.submit(preference.as_str());

        if let Some(appearance) = changed {
            debug!(preference = %preference, is_dark = appearance.is_dark, "theme preference changed");
            self.inner.observers.notify(&appearance);
        }
    }

    /// Flip between explicit light and dark based on what is shown now.
    /// Returns the preference that was set.
    pub fn toggle(&self) -> ThemePreference {
        let next = if self.is_dark() { ThemePreference::Light } else { ThemePreference::Dark };
        self.set_preference(next);
        next
    }

    /// Record a new host colour scheme. Returns whether it differed.
    pub fn set_host_scheme(&self, host: HostColorScheme) -> bool {
        let appearance = {
            let mut state = self.write_state();
            if state.host == host {
                return false;
            }
            state.host = host;
            Appearance::new(state.preference, host)
        };

        debug!(host = ?host, is_dark = appearance.is_dark, "host colour scheme changed");
        self.inner.observers.notify(&appearance);
        true
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn preference(&self) -> ThemePreference {
        self.read_state().preference
    }

    #[must_use]
    pub fn host_scheme(&self) -> HostColorScheme {
        self.read_state().host
    }

    /// Effective appearance: dark or not, derived from preference and host.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.appearance().is_dark
    }

    #[must_use]
    pub fn appearance(&self) -> Appearance {
        let state = self.read_state();
        Appearance::new(state.preference, state.host)
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register `observer` for preference and host scheme changes. It runs
    /// synchronously on the thread making the change and must not block.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&Appearance) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(observer)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
