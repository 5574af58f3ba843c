//! Composed state tree.
//!
//! One branch per unit name, each branch a JSON document. The tree has
//! no public mutators: writes happen inside this crate, through the
//! store's dispatch path or the strict-mode-checked `assign`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The whole application state, keyed by unit name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTree {
    branches: BTreeMap<String, Value>,
}

impl StateTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Branch value for a unit.
    pub fn branch(&self, name: &str) -> Option<&Value> {
        self.branches.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.branches.contains_key(name)
    }

    /// Branch names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.branches.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Resolve a dotted path: `unit`, `unit.field`, `unit.items.0`.
    ///
    /// Numeric segments index into arrays. An empty path or an empty
    /// segment resolves to nothing.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let head = segments.next().filter(|s| !s.is_empty())?;
        let mut current = self.branches.get(head)?;
        for seg in segments {
            current = step(current, seg)?;
        }
        Some(current)
    }

    /// The tree as a single JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.branches
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub(crate) fn set_branch(&mut self, name: &str, value: Value) {
        self.branches.insert(name.to_string(), value);
    }

    /// Mutable slot at a dotted path. The path must already exist.
    pub(crate) fn lookup_mut(&mut self, path: &str) -> Option<&mut Value> {
        let mut segments = path.split('.');
        let head = segments.next().filter(|s| !s.is_empty())?;
        let mut current = self.branches.get_mut(head)?;
        for seg in segments {
            current = step_mut(current, seg)?;
        }
        Some(current)
    }
}

impl FromIterator<(String, Value)> for StateTree {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            branches: iter.into_iter().collect(),
        }
    }
}

fn step<'a>(value: &'a Value, seg: &str) -> Option<&'a Value> {
    if seg.is_empty() {
        return None;
    }
    match value {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, seg: &str) -> Option<&'a mut Value> {
    if seg.is_empty() {
        return None;
    }
    match value {
        Value::Object(map) => map.get_mut(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}
