//! UI theme unit. Session-only: not in the persisted allow-list.

use serde_json::{json, Value};

use app_store_kernel::{ModuleUnit, StateTree, UnitSource};

pub const SOURCE: UnitSource = UnitSource::new(file!(), define);

pub const THEMES: &[&str] = &["light", "dark"];

pub fn define() -> ModuleUnit {
    ModuleUnit::new(json!("light"))
        .mutation("setTheme", set_theme)
        .mutation("toggle", toggle)
        .getter("isDark", is_dark)
}

fn set_theme(_state: &Value, arg: &Value) -> Result<Value, String> {
    match arg.as_str() {
        Some(theme) if THEMES.contains(&theme) => Ok(json!(theme)),
        _ => Err(format!("unknown theme {}, expected one of {:?}", arg, THEMES)),
    }
}

fn toggle(state: &Value, _arg: &Value) -> Result<Value, String> {
    match state.as_str() {
        Some("dark") => Ok(json!("light")),
        _ => Ok(json!("dark")),
    }
}

fn is_dark(tree: &StateTree) -> Value {
    json!(tree.branch("ui_theme").and_then(Value::as_str) == Some("dark"))
}
