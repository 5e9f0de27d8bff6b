//! Host colour scheme: what the operating system says it prefers.
//!
//! DESIGN
//! ======
//! `SchemeSource` abstracts the probe so the store can be tested without an
//! OS. `OsSchemeSource` asks the platform through `dark-light`; anything it
//! cannot answer counts as light. The watcher polls the source on a blocking
//! thread and forwards changes to `ThemeStore::set_host_scheme`, which is
//! how `System` preferences follow an OS-level dark-mode toggle.

#[cfg(test)]
#[path = "scheme_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::theme::ThemeStore;

/// Colour scheme reported by the host environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostColorScheme {
    /// Also stands in for "unknown".
    #[default]
    Light,
    Dark,
}

impl HostColorScheme {
    /// Map a nullable host report; `None` is treated as light.
    #[must_use]
    pub fn from_report(dark: Option<bool>) -> Self {
        match dark {
            Some(true) => Self::Dark,
            Some(false) | None => Self::Light,
        }
    }
}

/// Something that can report the current host colour scheme.
pub trait SchemeSource: Send + Sync {
    fn current(&self) -> HostColorScheme;
}

/// Asks the operating system via `dark-light`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsSchemeSource;

impl SchemeSource for OsSchemeSource {
    fn current(&self) -> HostColorScheme {
        let report = match dark_light::detect() {
            Ok(dark_light::Mode::Dark) => Some(true),
            Ok(dark_light::Mode::Light) => Some(false),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "host colour scheme probe failed; assuming light");
                None
            }
        };
        HostColorScheme::from_report(report)
    }
}

/// Always reports the same scheme. Used when detection is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedSchemeSource(pub HostColorScheme);

impl SchemeSource for FixedSchemeSource {
    fn current(&self) -> HostColorScheme {
        self.0
    }
}

/// Probe `source` once without blocking the async runtime.
pub async fn probe(source: Arc<dyn SchemeSource>) -> HostColorScheme {
    match tokio::task::spawn_blocking(move || source.current()).await {
        Ok(scheme) => scheme,
        Err(e) => {
            warn!(error = %e, "host colour scheme probe task failed; assuming light");
            HostColorScheme::Light
        }
    }
}

/// Spawn a task that polls `source` every `interval` and pushes changes
/// into `store`. Returns a handle for shutdown.
pub fn spawn_scheme_watcher(source: Arc<dyn SchemeSource>, store: ThemeStore, interval: Duration) -> JoinHandle<()> {
    info!(interval_ms = crate::config::millis(interval), "host colour scheme watcher started");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let scheme = probe(source.clone()).await;
            if store.set_host_scheme(scheme) {
                info!(host = ?scheme, "host colour scheme changed");
            }
        }
    })
}
