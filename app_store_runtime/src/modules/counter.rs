//! Counter unit: a single integer.

use serde_json::{json, Value};

use app_store_kernel::{ModuleUnit, StateTree, UnitSource};

pub const SOURCE: UnitSource = UnitSource::new(file!(), define);

pub fn define() -> ModuleUnit {
    ModuleUnit::new(json!(0))
        .mutation("increment", increment)
        .mutation("decrement", decrement)
        .mutation("reset", reset)
        .getter("isPositive", is_positive)
}

fn current(state: &Value) -> Result<i64, String> {
    state
        .as_i64()
        .ok_or_else(|| format!("counter state {} is not an integer", state))
}

fn amount(arg: &Value) -> Result<i64, String> {
    match arg {
        Value::Null => Ok(1),
        other => other
            .as_i64()
            .ok_or_else(|| format!("expected an integer amount, got {}", other)),
    }
}

/// Add `n` (default 1).
fn increment(state: &Value, arg: &Value) -> Result<Value, String> {
    let next = current(state)?
        .checked_add(amount(arg)?)
        .ok_or("counter overflow")?;
    Ok(json!(next))
}

/// Subtract `n` (default 1).
fn decrement(state: &Value, arg: &Value) -> Result<Value, String> {
    let next = current(state)?
        .checked_sub(amount(arg)?)
        .ok_or("counter overflow")?;
    Ok(json!(next))
}

fn reset(_state: &Value, _arg: &Value) -> Result<Value, String> {
    Ok(json!(0))
}

fn is_positive(tree: &StateTree) -> Value {
    json!(tree.branch("counter").and_then(Value::as_i64).unwrap_or(0) > 0)
}
