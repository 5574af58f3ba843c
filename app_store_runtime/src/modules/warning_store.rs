//! Warning list unit: user-visible warnings, oldest first.

use serde_json::{json, Value};

use app_store_kernel::{ModuleUnit, StateTree, UnitSource};

pub const SOURCE: UnitSource = UnitSource::new(file!(), define);

pub fn define() -> ModuleUnit {
    ModuleUnit::new(json!([]))
        .mutation("addWarning", add_warning)
        .mutation("dismissWarning", dismiss_warning)
        .mutation("clear", clear)
        .getter("count", count)
        .getter("latest", latest)
}

fn items(state: &Value) -> Result<Vec<Value>, String> {
    state
        .as_array()
        .cloned()
        .ok_or_else(|| format!("warning list state {} is not an array", state))
}

/// Append a non-empty message.
fn add_warning(state: &Value, arg: &Value) -> Result<Value, String> {
    let message = arg
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| format!("expected a non-empty warning message, got {}", arg))?;
    let mut items = items(state)?;
    items.push(json!(message));
    Ok(Value::Array(items))
}

/// Remove the warning at index `arg`.
fn dismiss_warning(state: &Value, arg: &Value) -> Result<Value, String> {
    let mut items = items(state)?;
    let index = arg
        .as_u64()
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < items.len())
        .ok_or_else(|| format!("no warning at index {}", arg))?;
    items.remove(index);
    Ok(Value::Array(items))
}

fn clear(_state: &Value, _arg: &Value) -> Result<Value, String> {
    Ok(json!([]))
}

fn count(tree: &StateTree) -> Value {
    json!(tree
        .branch("warning_store")
        .and_then(Value::as_array)
        .map_or(0, Vec::len))
}

fn latest(tree: &StateTree) -> Value {
    tree.branch("warning_store")
        .and_then(Value::as_array)
        .and_then(|items| items.last())
        .cloned()
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_dismiss() {
        let state = add_warning(&json!([]), &json!("low-disk")).unwrap();
        let state = add_warning(&state, &json!("offline")).unwrap();
        assert_eq!(state, json!(["low-disk", "offline"]));

        let state = dismiss_warning(&state, &json!(0)).unwrap();
        assert_eq!(state, json!(["offline"]));
        assert!(dismiss_warning(&state, &json!(3)).is_err());
        assert!(add_warning(&state, &json!("  ")).is_err());
        assert_eq!(clear(&state, &Value::Null), Ok(json!([])));
    }

    #[test]
    fn count_and_latest() {
        let tree: StateTree = [("warning_store".to_string(), json!(["low-disk", "offline"]))]
            .into_iter()
            .collect();
        assert_eq!(count(&tree), json!(2));
        assert_eq!(latest(&tree), json!("offline"));

        let empty = StateTree::new();
        assert_eq!(count(&empty), json!(0));
        assert_eq!(latest(&empty), Value::Null);
    }
}
