//! Result coercion
//!
//! Maps the sandbox's dynamically-typed completion value onto an
//! executor kind's declared output contract.

use task_contracts::{ExecutorError, Result, ScriptValue};

/// Largest magnitude at which every integral f64 is exact.
const EXACT_INT_BOUND: f64 = 9_007_199_254_740_992.0; // 2^53

/// Coerce a script-kind result.
///
/// `undefined`/`null` are the empty result, not an error. Integral
/// finite numbers within the engine's exact-integer range export as
/// JSON integers; other finite numbers export as JSON floats,
/// lossless. Function values are rejected.
pub fn coerce_script_output(value: ScriptValue) -> Result<serde_json::Value> {
    match value {
        ScriptValue::Undefined | ScriptValue::Null => Ok(serde_json::Value::Null),
        ScriptValue::Bool(b) => Ok(serde_json::Value::Bool(b)),
        ScriptValue::Number(n) => coerce_number(n),
        ScriptValue::String(s) => Ok(serde_json::Value::String(s)),
        ScriptValue::Object(v) => Ok(v),
        ScriptValue::Function => Err(ExecutorError::failed("Invalid output type is a function")),
    }
}

/// Coerce a branch-kind result.
///
/// The evaluated value must be an object carrying a string `next`
/// field naming the chosen trigger. The trigger is not re-checked
/// against the sibling set here; that happened at validate time.
pub fn coerce_branch_output(value: ScriptValue) -> Result<serde_json::Value> {
    match value {
        ScriptValue::Object(v)
            if v.get("next").and_then(serde_json::Value::as_str).is_some() =>
        {
            Ok(v)
        }
        _ => Err(ExecutorError::failed(
            "Expected output to be an object with a trigger field",
        )),
    }
}

fn coerce_number(n: f64) -> Result<serde_json::Value> {
    if !n.is_finite() {
        return Err(ExecutorError::failed(format!(
            "Invalid output: {} is not representable as JSON",
            n
        )));
    }
    if n.fract() == 0.0 && n.abs() <= EXACT_INT_BOUND {
        return Ok(serde_json::Value::from(n as i64));
    }
    Ok(serde_json::Value::from(n))
}
