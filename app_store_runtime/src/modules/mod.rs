//! Application Module Units.
//!
//! Each unit file declares its own `SOURCE`; `sources()` lists them for
//! the registry scan. Adding a unit means adding a file here and one line
//! to `sources()`.

use app_store_kernel::UnitSource;

pub mod counter;
pub mod ui_theme;
pub mod warning_store;

/// Designated unit location, relative to the crate root.
pub const LOCATION: &str = "src/modules";

pub fn sources() -> Vec<UnitSource> {
    vec![counter::SOURCE, warning_store::SOURCE, ui_theme::SOURCE]
}
