//! Theme preference: the user's light/dark choice and what it resolves to.
//!
//! DESIGN
//! ======
//! The user picks `Light`, `Dark`, or `System`. What the UI actually paints
//! is derived, never stored: `System` defers to the host colour scheme, the
//! other two ignore it. `ThemeStore` owns the choice, persists it and tells
//! observers when either input changes.

mod store;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scheme::HostColorScheme;
use crate::storage::StorageError;

pub use store::{InitOutcome, ThemeStore, ThemeStoreConfig};

/// Default storage key for the preference; overridable through config.
pub const DEFAULT_THEME_KEY: &str = "theme";

// =============================================================================
// PREFERENCE
// =============================================================================

/// The user's explicit theme selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the host colour scheme.
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::Light, Self::Dark, Self::System];

    /// Wire form persisted to storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized theme preference '{0}' (expected light, dark or system)")]
pub struct ParsePreferenceError(pub String);

impl FromStr for ThemePreference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ParsePreferenceError(other.to_string())),
        }
    }
}

// =============================================================================
// APPEARANCE
// =============================================================================

/// Whether the UI should render dark, given a preference and the host scheme.
#[must_use]
pub fn is_dark(preference: ThemePreference, host: HostColorScheme) -> bool {
    match preference {
        ThemePreference::Dark => true,
        ThemePreference::Light => false,
        ThemePreference::System => host == HostColorScheme::Dark,
    }
}

/// Point-in-time view of the store, handed to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Appearance {
    pub preference: ThemePreference,
    pub host: HostColorScheme,
    pub is_dark: bool,
}

impl Appearance {
    #[must_use]
    pub fn new(preference: ThemePreference, host: HostColorScheme) -> Self {
        Self { preference, host, is_dark: is_dark(preference, host) }
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Failures the theme store logs and swallows. Never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum ThemeStoreError {
    /// The backend could not be read or written.
    #[error("theme storage unavailable: {0}")]
    StorageUnavailable(StorageError),

    /// The persisted value, or the backend's data holding it, is unreadable.
    #[error("theme storage corrupt: {value}")]
    StorageCorrupt { value: String },

    /// The backend did not answer within the configured bound.
    #[error("theme storage timed out after {waited_ms}ms")]
    SuspendTimeout { waited_ms: u64 },
}

impl From<StorageError> for ThemeStoreError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Corrupt(value) => Self::StorageCorrupt { value },
            other => Self::StorageUnavailable(other),
        }
    }
}
