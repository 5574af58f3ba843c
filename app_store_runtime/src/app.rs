//! Startup wiring: scan units, attach persistence, compose.

use app_store_kernel::{
    ModuleRegistry, PersistedState, PersistenceBackend, PersistenceFilter, Store,
};

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::file_backend::FileBackend;
use crate::modules;

/// Units whose state survives a restart. Everything else starts from its
/// initial value on every launch.
pub const PERSISTED_UNITS: &[&str] = &["counter", "warning_store"];

pub fn persistence_filter() -> PersistenceFilter {
    PersistenceFilter::allow(PERSISTED_UNITS)
}

/// Scan the application's unit sources.
pub fn registry() -> Result<ModuleRegistry, RuntimeError> {
    Ok(ModuleRegistry::scan(modules::LOCATION, &modules::sources())?)
}

/// Open the application store backed by `<data_dir>/<app_key>.json`.
pub fn open_store(config: &RuntimeConfig) -> Result<Store, RuntimeError> {
    open_store_with(config, FileBackend::new(&config.data_dir))
}

/// Open the application store on any backend.
pub fn open_store_with(
    config: &RuntimeConfig,
    backend: impl PersistenceBackend + 'static,
) -> Result<Store, RuntimeError> {
    config.validate()?;
    let registry = registry()?;
    tracing::info!(
        app_key = %config.app_key,
        environment = ?config.environment,
        units = registry.len(),
        "opening application store"
    );
    let persistence = PersistedState::new(config.app_key.clone(), persistence_filter(), backend);
    Ok(Store::compose(
        registry,
        config.store_options(),
        Some(persistence),
    ))
}
