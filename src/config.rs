//! Application configuration parsed from environment variables.
//!
//! Every setting has a default; malformed values fall back to it rather
//! than aborting start-up.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use crate::theme::DEFAULT_THEME_KEY;

pub const DEFAULT_INIT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_SCHEME_POLL_MS: u64 = 1000;
pub const APP_DIR_NAME: &str = "academy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `storage.json`. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub init_timeout: Duration,
    pub scheme_poll_interval: Duration,
    pub theme_key: String,
    /// When false the host scheme is pinned to light.
    pub detect_scheme: bool,
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ACADEMY_DATA_DIR`: default `<platform data dir>/academy`
    /// - `ACADEMY_INIT_TIMEOUT_MS`: default 2000
    /// - `ACADEMY_SCHEME_POLL_MS`: default 1000
    /// - `ACADEMY_THEME_KEY`: default `theme`
    /// - `ACADEMY_DETECT_SCHEME`: `true` (default) or `false`
    /// - `ACADEMY_CATALOG_PATH`: JSON course list to load at start-up
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir = match std::env::var("ACADEMY_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
            _ => default_data_dir(),
        };
        let theme_key = match std::env::var("ACADEMY_THEME_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => DEFAULT_THEME_KEY.to_string(),
        };
        let catalog_path = match std::env::var("ACADEMY_CATALOG_PATH") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => None,
        };

        Self {
            data_dir,
            init_timeout: Duration::from_millis(env_parse("ACADEMY_INIT_TIMEOUT_MS", DEFAULT_INIT_TIMEOUT_MS)),
            scheme_poll_interval: Duration::from_millis(
                env_parse("ACADEMY_SCHEME_POLL_MS", DEFAULT_SCHEME_POLL_MS).max(1),
            ),
            theme_key,
            detect_scheme: env_parse("ACADEMY_DETECT_SCHEME", true),
            catalog_path,
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
