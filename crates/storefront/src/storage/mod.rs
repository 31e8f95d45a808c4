//! Key/value storage backing the cart.
//!
//! [`Storage`] mirrors the shape of browser local storage: string keys,
//! string values, whole-value writes. Backends decide where bytes go; the
//! cart layer decides what is stored and how failures degrade.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - shared in-process map with optional quota and an
//!   off switch, used by tests and to simulate blocked storage
//! - [`FileStorage`] - one JSON file holding every key, replaced atomically
//!   on each write

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when accessing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is turned off or otherwise unreachable.
    #[error("storage unavailable")]
    Unavailable,

    /// The write would exceed the backend's quota.
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded {
        /// Maximum number of bytes the backend holds.
        limit: usize,
    },

    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a valid key/value document.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string key/value store.
///
/// Methods take `&self`; backends with in-memory state use interior
/// mutability. Every `set_item` replaces the whole value for its key.
pub trait Storage {
    /// Read the value for `key`. Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Succeeds when the key was already absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
