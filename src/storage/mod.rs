//! Local key-value storage: the app's only durable state.
//!
//! DESIGN
//! ======
//! Everything the client persists (theme preference, auth session) is a
//! string value under a fixed key. Backends implement `KeyValueStore`;
//! callers hold an `Arc<dyn KeyValueStore>` so tests can swap in fakes.
//!
//! TRADE-OFFS
//! ==========
//! Writes are fire-and-forget through `WriteQueue`, which keeps at most one
//! pending value per key. Durable state can lag memory by one write.

pub mod file;
pub mod memory;
pub mod writer;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use writer::{WriteQueue, spawn_writer};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by key-value backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data exists but is not in the expected shape.
    #[error("storage corrupt: {0}")]
    Corrupt(String),

    /// A value could not be encoded for storage.
    #[error("storage serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why a stateful store kept its default instead of a persisted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The backend could not be read.
    Unavailable,
    /// The stored value did not parse.
    Corrupt,
    /// The read did not finish within its bound.
    Timeout,
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Async string key-value store. Enables mocking in tests.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
