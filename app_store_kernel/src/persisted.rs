//! Persisted state: filter + record key + backend, attached to a store.
//!
//! Best effort, never transactional with state changes:
//!   - `restore` runs once at compose. Any read or decode failure leaves
//!     every branch at its static initial value.
//!   - `save` runs after every committed mutation and replaces the
//!     previous record wholesale. A failure is returned to the store,
//!     which logs it and keeps the in-memory change.

use crate::backend::PersistenceBackend;
use crate::error::PersistenceError;
use crate::filter::PersistenceFilter;
use crate::record::{decode_record, encode_record};
use crate::tree::StateTree;

pub struct PersistedState {
    key: String,
    filter: PersistenceFilter,
    backend: Box<dyn PersistenceBackend>,
}

impl PersistedState {
    pub fn new(
        key: impl Into<String>,
        filter: PersistenceFilter,
        backend: impl PersistenceBackend + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            filter,
            backend: Box::new(backend),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn filter(&self) -> &PersistenceFilter {
        &self.filter
    }

    /// Read the stored record, if any. Only branches covered by the
    /// filter are returned, whatever else the record holds.
    pub fn load(&self) -> Result<Option<StateTree>, PersistenceError> {
        let Some(document) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        let stored = decode_record(&document)?;
        for name in stored.names().filter(|n| !self.filter.covers(n)) {
            tracing::debug!(key = %self.key, branch = name, "ignoring unfiltered branch in record");
        }
        Ok(Some(self.filter.subset(&stored)))
    }

    /// Overlay the stored record onto freshly seeded state. Returns the
    /// names of the branches that were rehydrated.
    pub fn restore(&self, tree: &mut StateTree) -> Vec<String> {
        let stored = match self.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted record, starting from initial state");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "persisted record unreadable, starting from initial state");
                return Vec::new();
            }
        };

        let mut restored = Vec::new();
        for (name, value) in stored.iter() {
            if !tree.contains(name) {
                tracing::debug!(key = %self.key, branch = name, "persisted branch has no registered unit");
                continue;
            }
            tree.set_branch(name, value.clone());
            restored.push(name.to_string());
        }
        restored
    }

    /// Write `filter(tree)` under the record key.
    pub fn save(&mut self, tree: &StateTree) -> Result<(), PersistenceError> {
        let document = encode_record(&self.filter.subset(tree))?;
        self.backend.set(&self.key, &document)
    }
}

impl std::fmt::Debug for PersistedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedState")
            .field("key", &self.key)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
