//! Store: the single composed state tree.
//!
//! Apply-then-persist order for every dispatch:
//!   1. Resolve unit and mutation (unknown names fail, nothing changes)
//!   2. Run the mutation on a copy of the branch (rejection changes nothing)
//!   3. Replace the branch and bump the commit sequence
//!   4. Notify subscribers
//!   5. Write `filter(state)` to the backend, logging any failure
//!
//! The tree is only reachable through shared borrows and owned
//! snapshots. `assign` is the one out-of-band write and strict mode
//! rejects it.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StoreError;
use crate::persisted::PersistedState;
use crate::registry::ModuleRegistry;
use crate::tree::StateTree;
use crate::unit::ModuleUnit;

/// Store construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Reject writes that do not go through `dispatch`.
    pub strict: bool,
}

impl Default for StoreOptions {
    /// Strict in debug builds, relaxed in release builds.
    fn default() -> Self {
        Self {
            strict: cfg!(debug_assertions),
        }
    }
}

/// A committed mutation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub sequence: u64,
    pub unit: String,
    pub operation: String,
    pub payload: Value,
}

type Subscriber = Box<dyn FnMut(&Commit, &StateTree)>;

pub struct Store {
    units: BTreeMap<String, ModuleUnit>,
    state: StateTree,
    options: StoreOptions,
    persistence: Option<PersistedState>,
    subscribers: Vec<Subscriber>,
    sequence: u64,
    restored: Vec<String>,
}

impl Store {
    /// Compose the registry into one tree, seeded from each unit's
    /// initial value and overlaid with the persisted record for the
    /// branches the filter covers.
    pub fn compose(
        registry: ModuleRegistry,
        options: StoreOptions,
        persistence: Option<PersistedState>,
    ) -> Self {
        let units = registry.into_units();
        let mut state: StateTree = units
            .iter()
            .map(|(name, unit)| (name.clone(), unit.initial().clone()))
            .collect();

        let restored = persistence
            .as_ref()
            .map(|p| p.restore(&mut state))
            .unwrap_or_default();

        tracing::info!(
            units = units.len(),
            strict = options.strict,
            persisted = persistence.is_some(),
            restored = ?restored,
            "store composed"
        );

        Self {
            units,
            state,
            options,
            persistence,
            subscribers: Vec::new(),
            sequence: 0,
            restored,
        }
    }

    /// Run a unit's mutation with `arg` and persist the result.
    pub fn dispatch(
        &mut self,
        unit_name: &str,
        operation: &str,
        arg: Value,
    ) -> Result<(), StoreError> {
        let unit = self
            .units
            .get(unit_name)
            .ok_or_else(|| StoreError::UnitNotFound(unit_name.to_string()))?;
        let mutation =
            unit.find_mutation(operation)
                .ok_or_else(|| StoreError::OperationNotFound {
                    unit: unit_name.to_string(),
                    operation: operation.to_string(),
                })?;

        let current = self
            .state
            .branch(unit_name)
            .unwrap_or_else(|| unit.initial());
        let next = mutation(current, &arg).map_err(|reason| StoreError::InvalidArgument {
            unit: unit_name.to_string(),
            operation: operation.to_string(),
            reason,
        })?;

        self.state.set_branch(unit_name, next);
        self.sequence += 1;
        tracing::debug!(sequence = self.sequence, unit = unit_name, operation, "commit");

        if !self.subscribers.is_empty() {
            let commit = Commit {
                sequence: self.sequence,
                unit: unit_name.to_string(),
                operation: operation.to_string(),
                payload: arg,
            };
            for subscriber in &mut self.subscribers {
                subscriber(&commit, &self.state);
            }
        }

        if let Some(persistence) = self.persistence.as_mut() {
            if let Err(err) = persistence.save(&self.state) {
                tracing::warn!(
                    key = persistence.key(),
                    sequence = self.sequence,
                    error = %err,
                    "persisting state failed, in-memory change kept"
                );
            }
        }

        Ok(())
    }

    /// Owned snapshot of the value at a dotted path.
    pub fn read(&self, path: &str) -> Option<Value> {
        self.state.lookup(path).cloned()
    }

    /// Shared view of the whole tree.
    pub fn state(&self) -> &StateTree {
        &self.state
    }

    /// Owned copy of the whole tree.
    pub fn snapshot(&self) -> StateTree {
        self.state.clone()
    }

    /// Evaluate one derived computation against the current tree.
    pub fn derive(&self, unit_name: &str, computation: &str) -> Result<Value, StoreError> {
        let unit = self
            .units
            .get(unit_name)
            .ok_or_else(|| StoreError::UnitNotFound(unit_name.to_string()))?;
        let getter =
            unit.find_getter(computation)
                .ok_or_else(|| StoreError::ComputationNotFound {
                    unit: unit_name.to_string(),
                    computation: computation.to_string(),
                })?;
        Ok(getter(&self.state))
    }

    /// Evaluate every derived computation, keyed `"unit/name"`.
    pub fn derive_all(&self) -> BTreeMap<String, Value> {
        let mut out = BTreeMap::new();
        for (unit_name, unit) in &self.units {
            for name in unit.getter_names() {
                if let Some(getter) = unit.find_getter(name) {
                    out.insert(format!("{}/{}", unit_name, name), getter(&self.state));
                }
            }
        }
        out
    }

    /// Write directly to an existing path, bypassing mutations.
    ///
    /// Rejected in strict mode. Otherwise applied in memory only: no
    /// commit, no subscribers, no persistence.
    pub fn assign(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        if self.options.strict {
            tracing::warn!(path, "direct state write rejected in strict mode");
            return Err(StoreError::StrictModeViolation {
                path: path.to_string(),
            });
        }

        let head = path.split('.').next().unwrap_or_default();
        if !self.units.contains_key(head) {
            return Err(StoreError::UnitNotFound(head.to_string()));
        }
        let slot = self
            .state
            .lookup_mut(path)
            .ok_or_else(|| StoreError::PathNotFound(path.to_string()))?;
        *slot = value;
        tracing::debug!(path, "direct state write outside dispatch");
        Ok(())
    }

    /// Register a commit observer. Observers run in registration order
    /// after each successful dispatch, before the persistence write.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Commit, &StateTree) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn is_strict(&self) -> bool {
        self.options.strict
    }

    /// Number of committed mutations since compose.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Branches that were seeded from the persisted record at compose.
    pub fn restored_branches(&self) -> &[String] {
        &self.restored
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(|k| k.as_str())
    }

    /// Mutation names declared by a unit.
    pub fn operations(&self, unit_name: &str) -> Result<Vec<&'static str>, StoreError> {
        self.units
            .get(unit_name)
            .map(|u| u.mutation_names().collect())
            .ok_or_else(|| StoreError::UnitNotFound(unit_name.to_string()))
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("persistence", &self.persistence)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
