//! Local key-value storage for the persisted cart.
//!
//! The cart is mirrored to a device-local store that maps string keys to
//! string blobs. The store is read once at session start and overwritten in
//! full on every change; it is never the source of truth while a session is
//! running.
//!
//! # Backends
//!
//! - [`FileStore`] - One file per key in a directory on the device
//! - [`MemoryStore`] - In-process map, used in tests and embedded setups

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if there is none.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
}
