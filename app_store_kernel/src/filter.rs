//! Persistence Filter.
//!
//! A static allow-list of unit branches that survive a restart. Pure:
//! `subset` never looks at anything but its input tree.

use std::collections::BTreeSet;

use crate::tree::StateTree;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceFilter {
    allowed: BTreeSet<String>,
}

impl PersistenceFilter {
    pub fn allow(names: &[&str]) -> Self {
        Self {
            allowed: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Persist nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn covers(&self, name: &str) -> bool {
        self.allowed.contains(name)
    }

    pub fn persisted_names(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(|n| n.as_str())
    }

    /// The part of `tree` that is written to durable storage. Allowed
    /// names with no branch in the tree are simply absent.
    pub fn subset(&self, tree: &StateTree) -> StateTree {
        tree.iter()
            .filter(|(name, _)| self.covers(name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}
