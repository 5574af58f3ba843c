#![forbid(unsafe_code)]

//! Application state kernel.
//!
//! Independently authored Module Units are discovered into a registry,
//! composed into one store, and a static filter decides which branches
//! survive a restart.
//!
//! No I/O lives here apart from the `PersistenceBackend` seam; the
//! runtime crate supplies durable backends and configuration.

pub mod backend;
pub mod error;
pub mod filter;
pub mod persisted;
pub mod record;
pub mod registry;
pub mod store;
pub mod tree;
pub mod unit;

pub use backend::{MemoryBackend, PersistenceBackend};
pub use error::{PersistenceError, StoreError};
pub use filter::PersistenceFilter;
pub use persisted::PersistedState;
pub use registry::ModuleRegistry;
pub use store::{Commit, Store, StoreOptions};
pub use tree::StateTree;
pub use unit::{Getter, ModuleUnit, Mutation, UnitSource};
