//! Script sandbox contract
//!
//! The embedded interpreter is an injected dependency behind a narrow
//! interface: compile-check and run. This keeps validation and
//! coercion logic independent of the actual engine, so a host can
//! swap in a restricted expression evaluator without touching the
//! executors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::Task;

/// Read-only bindings injected into a sandbox run
///
/// Exactly two names are bound when available: `deps` (upstream task
/// outputs keyed by task ID) and `input` (the workflow's global
/// input). The sandbox receives copies; the host's values are never
/// mutated by script execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    /// Value bound as `deps`, if the task has dependencies
    pub deps: Option<serde_json::Value>,
    /// Value bound as `input`, if the workflow has a global input
    pub input: Option<serde_json::Value>,
}

impl Bindings {
    /// Bindings with neither name bound
    pub fn none() -> Self {
        Self::default()
    }

    /// Bind a task's dependency outputs and global input
    pub fn for_task(task: &Task) -> Self {
        Self {
            deps: task
                .dependencies
                .as_ref()
                .and_then(|d| serde_json::to_value(d).ok()),
            input: task.global_input.clone(),
        }
    }
}

/// Dynamically-typed result of one sandbox run
///
/// Engine-neutral: the sandbox maps its own value representation onto
/// this set before returning, and result coercion maps it onto the
/// executor's output contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    /// The script completed without producing a value
    Undefined,
    /// An explicit null
    Null,
    /// A boolean
    Bool(bool),
    /// A number (the engine's numeric type)
    Number(f64),
    /// A string
    String(String),
    /// Any structured value, exported as JSON
    Object(serde_json::Value),
    /// A function value; no output contract accepts these
    Function,
}

/// Failures raised by the sandbox itself
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The program text did not parse
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// The interpreter raised an error while running
    #[error("{0}")]
    Runtime(String),

    /// Exporting the result out of the interpreter failed
    #[error("Export failed: {0}")]
    Export(String),

    /// The wall-clock budget was exceeded
    #[error("Script exceeded the execution budget")]
    Timeout,
}

/// An isolated, short-lived interpreter environment
///
/// Each `run` call must evaluate the program in a fresh interpreter
/// instance; no state survives across calls. Implementations must not
/// expose timers, network, or filesystem capabilities to the program.
pub trait ScriptSandbox: Send + Sync {
    /// Check that `source` is syntactically valid script, without
    /// evaluating it or resolving any bindings
    fn check_syntax(&self, source: &str) -> Result<(), SandboxError>;

    /// Compile and run a complete program with the given bindings,
    /// returning its completion value
    fn run(&self, program: &str, bindings: &Bindings) -> Result<ScriptValue, SandboxError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bindings_default_is_unbound() {
        let bindings = Bindings::none();
        assert!(bindings.deps.is_none());
        assert!(bindings.input.is_none());
    }

    #[test]
    fn test_bindings_for_task() {
        let mut deps = std::collections::HashMap::new();
        deps.insert("task1".to_string(), json!("done"));
        let task = Task::new("t", "javascript")
            .with_dependencies(deps)
            .with_global_input(json!({"x": 5}));

        let bindings = Bindings::for_task(&task);
        assert_eq!(bindings.deps, Some(json!({"task1": "done"})));
        assert_eq!(bindings.input, Some(json!({"x": 5})));

        let bare = Bindings::for_task(&Task::new("t", "javascript"));
        assert_eq!(bare, Bindings::none());
    }

    #[test]
    fn test_script_value_equality() {
        assert_eq!(ScriptValue::Number(2.0), ScriptValue::Number(2.0));
        assert_ne!(ScriptValue::Null, ScriptValue::Undefined);
        assert_eq!(
            ScriptValue::Object(json!({"next": "task1"})),
            ScriptValue::Object(json!({"next": "task1"}))
        );
    }
}
