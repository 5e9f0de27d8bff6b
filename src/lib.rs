//! Academy: non-UI core of the course-catalog client.
//!
//! ARCHITECTURE
//! ============
//! - `theme`: the user's light/dark/system choice, its derived appearance,
//!   persistence and change notification.
//! - `scheme`: host colour scheme probe and watcher feeding `theme`.
//! - `auth`: the persisted signed-in session.
//! - `catalog`: course records and the browser's category/search filter.
//! - `storage`: async key-value backends and the latest-wins writer.
//! - `config`: environment-driven settings for the composition root.
//!
//! Stores are built explicitly by the caller and passed around as cheap
//! clones; nothing here is a process-wide global.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod observers;
pub mod scheme;
pub mod storage;
pub mod theme;

pub use auth::{AuthState, AuthStore, HydrateOutcome, User};
pub use catalog::{Course, CourseQuery, Level, categories, filter_courses, load_catalog};
pub use config::AppConfig;
pub use observers::SubscriptionId;
pub use scheme::{FixedSchemeSource, HostColorScheme, OsSchemeSource, SchemeSource, spawn_scheme_watcher};
pub use storage::{FallbackReason, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use theme::{Appearance, InitOutcome, ThemePreference, ThemeStore, ThemeStoreConfig};
