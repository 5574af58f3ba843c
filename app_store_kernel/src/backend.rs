//! Persistence Backend seam.
//!
//! The store needs only `get` and `set` on a single application-scoped
//! key. Documents are opaque strings to the backend.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::PersistenceError;

/// Durable key-value storage for persisted records.
pub trait PersistenceBackend {
    /// Read the document stored under `key`, `Ok(None)` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the document stored under `key`.
    fn set(&mut self, key: &str, document: &str) -> Result<(), PersistenceError>;
}

/// In-process backend. Clones share the same storage, so a handle kept
/// outside the store observes every write and can seed a second store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current document under `key`, bypassing the trait.
    pub fn document(&self, key: &str) -> Option<String> {
        self.records.borrow().get(key).cloned()
    }

    /// Overwrite a document directly (test fixtures, migrations).
    pub fn put(&self, key: &str, document: &str) {
        self.records
            .borrow_mut()
            .insert(key.to_string(), document.to_string());
    }
}

impl PersistenceBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.document(key))
    }

    fn set(&mut self, key: &str, document: &str) -> Result<(), PersistenceError> {
        self.put(key, document);
        Ok(())
    }
}
