//! Module Registry.
//!
//! Turns a static list of unit sources into a name → unit mapping.
//! Only sources sitting directly in the designated location with a `.rs`
//! extension are taken; subdirectories are not traversed. The name is the
//! file stem. Runs once, before the store is composed.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::unit::{ModuleUnit, UnitSource};

/// Extension a source identifier must carry to be picked up.
pub const UNIT_EXTENSION: &str = "rs";

/// Name → unit mapping produced at startup.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    units: BTreeMap<String, ModuleUnit>,
}

impl ModuleRegistry {
    /// Scan `sources` for units defined directly inside `location`.
    ///
    /// No matches is an empty registry, not an error. Two sources that
    /// derive the same name abort with `StoreError::Configuration`.
    pub fn scan(location: &str, sources: &[UnitSource]) -> Result<Self, StoreError> {
        let location = normalize(location);
        let location = match location.trim_end_matches('/') {
            "." => "",
            trimmed => trimmed,
        };

        let mut units = BTreeMap::new();
        let mut origins: BTreeMap<String, &'static str> = BTreeMap::new();

        for source in sources {
            let Some(name) = unit_name_in(location, source.id) else {
                tracing::trace!(id = source.id, location, "source outside unit location, skipped");
                continue;
            };
            if let Some(first) = origins.get(&name) {
                return Err(StoreError::Configuration(format!(
                    "duplicate unit name {:?}: defined by {:?} and {:?}",
                    name, first, source.id
                )));
            }
            origins.insert(name.clone(), source.id);
            units.insert(name, (source.define)());
        }

        tracing::debug!(location, units = units.len(), "unit registry scanned");
        Ok(Self { units })
    }

    /// Build from explicit `(name, unit)` pairs.
    pub fn from_units<I, S>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (S, ModuleUnit)>,
        S: Into<String>,
    {
        let mut units = BTreeMap::new();
        for (name, unit) in pairs {
            let name = name.into();
            if name.is_empty() {
                return Err(StoreError::Configuration(
                    "unit name must not be empty".to_string(),
                ));
            }
            if units.contains_key(&name) {
                return Err(StoreError::Configuration(format!(
                    "duplicate unit name {:?}",
                    name
                )));
            }
            units.insert(name, unit);
        }
        Ok(Self { units })
    }

    pub fn get(&self, name: &str) -> Option<&ModuleUnit> {
        self.units.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub(crate) fn into_units(self) -> BTreeMap<String, ModuleUnit> {
        self.units
    }
}

/// Derive a unit name from a source identifier: strip the relative-path
/// prefix and the extension. `None` when the identifier has no stem or
/// the wrong extension.
pub fn derive_unit_name(id: &str) -> Option<String> {
    let id = normalize(id);
    let file = id.rsplit('/').next()?;
    let stem = file.strip_suffix(UNIT_EXTENSION)?.strip_suffix('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// Name of the unit if `id` lives directly in `location`.
fn unit_name_in(location: &str, id: &str) -> Option<String> {
    let id = normalize(id);
    let (parent, _) = id.rsplit_once('/').unwrap_or(("", id.as_str()));
    let direct = parent == location
        || (!location.is_empty() && parent.ends_with(&format!("/{}", location)));
    if !direct {
        return None;
    }
    derive_unit_name(&id)
}

/// Forward slashes only, no leading `./`.
fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut rest = path.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zero() -> ModuleUnit {
        ModuleUnit::new(json!(0))
    }

    fn empty_list() -> ModuleUnit {
        ModuleUnit::new(json!([]))
    }

    #[test]
    fn names_strip_prefix_and_extension() {
        assert_eq!(derive_unit_name("./counter.rs").as_deref(), Some("counter"));
        assert_eq!(
            derive_unit_name("crate/src/modules/warning_store.rs").as_deref(),
            Some("warning_store")
        );
        assert_eq!(
            derive_unit_name(r"src\modules\ui_theme.rs").as_deref(),
            Some("ui_theme")
        );
        assert_eq!(derive_unit_name("notes.txt"), None);
        assert_eq!(derive_unit_name(".rs"), None);
        assert_eq!(derive_unit_name("src/modules/"), None);
    }

    #[test]
    fn scan_is_not_recursive() {
        let sources = [
            UnitSource::new("app/src/modules/counter.rs", zero),
            UnitSource::new("app/src/modules/nested/deep.rs", zero),
            UnitSource::new("app/src/other/elsewhere.rs", zero),
            UnitSource::new("app/src/modules/readme.md", zero),
        ];
        let registry = ModuleRegistry::scan("src/modules", &sources).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["counter"]);
    }

    #[test]
    fn scan_accepts_relative_location() {
        let sources = [
            UnitSource::new("./counter.rs", zero),
            UnitSource::new("./sub/ignored.rs", zero),
        ];
        let registry = ModuleRegistry::scan(".", &sources).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["counter"]);
    }

    #[test]
    fn duplicate_names_are_a_configuration_error() {
        let sources = [
            UnitSource::new("src/modules/counter.rs", zero),
            UnitSource::new(r"src\modules\counter.rs", empty_list),
        ];
        let err = ModuleRegistry::scan("src/modules", &sources).unwrap_err();
        assert!(matches!(err, StoreError::Configuration(ref msg) if msg.contains("counter")));
    }

    #[test]
    fn no_matches_is_empty_not_an_error() {
        let registry = ModuleRegistry::scan("src/modules", &[]).unwrap();
        assert!(registry.is_empty());

        let sources = [UnitSource::new("src/elsewhere/counter.rs", zero)];
        let registry = ModuleRegistry::scan("src/missing", &sources).unwrap();
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn explicit_units_reject_duplicates() {
        let err = ModuleRegistry::from_units([("a", zero()), ("a", empty_list())]).unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));

        let err = ModuleRegistry::from_units([("", zero())]).unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
    }
}
