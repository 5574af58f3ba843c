#![forbid(unsafe_code)]

//! Application store runtime.
//!
//! Wires the kernel to a real process: the application's Module Units,
//! the persisted allow-list, a file-backed record store, configuration
//! and logging. No state logic lives here.

pub mod app;
pub mod config;
pub mod error;
pub mod file_backend;
pub mod modules;
pub mod telemetry;

pub use app::{open_store, open_store_with, persistence_filter, registry, PERSISTED_UNITS};
pub use config::{Environment, RuntimeConfig};
pub use error::{ConfigError, RuntimeError};
pub use file_backend::FileBackend;
