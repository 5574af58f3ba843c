//! Module Unit definitions.
//!
//! A unit is pure data plus function pointers: an initial branch value,
//! named mutations and named derived computations. Units perform no I/O;
//! persistence is the store's job.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::tree::StateTree;

/// `(current branch, argument) -> next branch`. `Err(reason)` rejects
/// the argument and leaves the branch untouched.
pub type Mutation = fn(&Value, &Value) -> Result<Value, String>;

/// Pure function of the whole composed tree.
pub type Getter = fn(&StateTree) -> Value;

/// A self-contained fragment of application state.
#[derive(Clone)]
pub struct ModuleUnit {
    initial: Value,
    mutations: BTreeMap<&'static str, Mutation>,
    getters: BTreeMap<&'static str, Getter>,
}

impl ModuleUnit {
    pub fn new(initial: Value) -> Self {
        Self {
            initial,
            mutations: BTreeMap::new(),
            getters: BTreeMap::new(),
        }
    }

    /// Declare a mutation. A later declaration with the same name replaces
    /// the earlier one.
    pub fn mutation(mut self, name: &'static str, op: Mutation) -> Self {
        self.mutations.insert(name, op);
        self
    }

    /// Declare a derived computation.
    pub fn getter(mut self, name: &'static str, compute: Getter) -> Self {
        self.getters.insert(name, compute);
        self
    }

    pub fn initial(&self) -> &Value {
        &self.initial
    }

    pub fn find_mutation(&self, name: &str) -> Option<Mutation> {
        self.mutations.get(name).copied()
    }

    pub fn find_getter(&self, name: &str) -> Option<Getter> {
        self.getters.get(name).copied()
    }

    pub fn mutation_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mutations.keys().copied()
    }

    pub fn getter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.getters.keys().copied()
    }
}

impl fmt::Debug for ModuleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleUnit")
            .field("initial", &self.initial)
            .field("mutations", &self.mutations.keys().collect::<Vec<_>>())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A statically declared unit definition, identified by its source path.
///
/// Declared next to the unit it defines:
///
/// ```ignore
/// pub const SOURCE: UnitSource = UnitSource::new(file!(), define);
/// ```
#[derive(Clone, Copy)]
pub struct UnitSource {
    pub id: &'static str,
    pub define: fn() -> ModuleUnit,
}

impl UnitSource {
    pub const fn new(id: &'static str, define: fn() -> ModuleUnit) -> Self {
        Self { id, define }
    }
}

impl fmt::Debug for UnitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitSource").field("id", &self.id).finish()
    }
}
