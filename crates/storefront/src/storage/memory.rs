//! In-memory storage backend.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Storage, StorageError};

/// In-process key/value storage.
///
/// Clones share the same entries, the way every page of one origin shares
/// one local storage area. A byte quota and an off switch let callers
/// reproduce the failure modes of real browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    disabled: bool,
}

impl MemoryStorage {
    /// Create an empty, unlimited storage area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage area that rejects writes pushing it past `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::new();
        storage.inner.borrow_mut().quota = Some(bytes);
        storage
    }

    /// Turn every operation into [`StorageError::Unavailable`], or back.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Raw value for `key`, ignoring the off switch.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Write `value` directly, ignoring quota and the off switch.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }
}

impl MemoryInner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.borrow();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        if let Some(limit) = inner.quota {
            if inner.used_bytes_with(key, value) > limit {
                return Err(StorageError::QuotaExceeded { limit });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StorageError::Unavailable);
        }
        inner.entries.remove(key);
        Ok(())
    }
}
