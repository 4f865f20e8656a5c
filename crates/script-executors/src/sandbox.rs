//! Sandboxed script evaluation using boa_engine
//!
//! Each run creates a fresh [`boa_engine::Context`] on a dedicated
//! thread, so no interpreter state survives across calls and a
//! wall-clock budget can be enforced from the outside. Boa exposes no
//! timers, network, or filesystem to the evaluated program.
//!
//! Bindings are injected as a synthesized `JSON.parse(..)` prelude:
//! the script only ever sees throwaway copies of `deps` and `input`,
//! and the technique works for any engine that can parse JSON.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use boa_engine::{Context, Script, Source};
use log::{debug, warn};

use task_contracts::{Bindings, SandboxError, ScriptSandbox, ScriptValue};

/// Sandbox configuration
#[derive(Debug, Clone, Copy)]
pub struct SandboxConfig {
    /// Wall-clock budget for one run
    pub budget: Duration,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            budget: Duration::from_secs(5),
        }
    }
}

/// Script sandbox backed by boa_engine
#[derive(Debug, Clone, Default)]
pub struct BoaSandbox {
    config: SandboxConfig,
}

impl BoaSandbox {
    /// Create a sandbox with the given configuration
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Create a sandbox with a specific execution budget
    pub fn with_budget(budget: Duration) -> Self {
        Self::new(SandboxConfig { budget })
    }

    /// The configured wall-clock budget
    pub fn budget(&self) -> Duration {
        self.config.budget
    }
}

impl ScriptSandbox for BoaSandbox {
    fn check_syntax(&self, source: &str) -> Result<(), SandboxError> {
        let mut context = Context::default();
        Script::parse(Source::from_bytes(source), None, &mut context)
            .map(|_| ())
            .map_err(|e| SandboxError::Syntax(e.to_string()))
    }

    fn run(&self, program: &str, bindings: &Bindings) -> Result<ScriptValue, SandboxError> {
        let mut full_program = String::new();
        if let Some(deps) = &bindings.deps {
            full_program.push_str(&binding_statement("deps", deps));
        }
        if let Some(input) = &bindings.input {
            full_program.push_str(&binding_statement("input", input));
        }
        full_program.push_str(program);

        debug!("Running sandboxed program ({} bytes)", full_program.len());

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = evaluate(&full_program);
            // The receiver may have given up already; nothing to do then.
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.config.budget) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // The worker thread cannot be killed; it is abandoned and
                // will be cleaned up when the process exits.
                warn!("Sandboxed program exceeded its {:?} budget", self.config.budget);
                Err(SandboxError::Timeout)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(SandboxError::Export("sandbox thread terminated".to_string()))
            }
        }
    }
}

/// Synthesize one `var <name> = JSON.parse(..);` binding statement.
///
/// The value's JSON text is itself encoded as a JSON string literal,
/// which is also a valid script string literal.
fn binding_statement(name: &str, value: &serde_json::Value) -> String {
    let literal = serde_json::Value::String(value.to_string()).to_string();
    format!("var {} = JSON.parse({});\n", name, literal)
}

/// Evaluate a complete program in a fresh interpreter and export its
/// completion value.
fn evaluate(program: &str) -> Result<ScriptValue, SandboxError> {
    let mut context = Context::default();
    let value = context
        .eval(Source::from_bytes(program))
        .map_err(|e| SandboxError::Runtime(e.to_string()))?;

    if value.is_undefined() {
        return Ok(ScriptValue::Undefined);
    }
    if value.is_null() {
        return Ok(ScriptValue::Null);
    }
    if value.is_boolean() {
        return Ok(ScriptValue::Bool(value.to_boolean()));
    }
    if value.is_number() {
        let n = value
            .to_number(&mut context)
            .map_err(|e| SandboxError::Export(e.to_string()))?;
        return Ok(ScriptValue::Number(n));
    }
    if value.is_string() {
        let s = value
            .to_string(&mut context)
            .map_err(|e| SandboxError::Export(e.to_string()))?
            .to_std_string_escaped();
        return Ok(ScriptValue::String(s));
    }
    if value.is_callable() {
        return Ok(ScriptValue::Function);
    }
    if value.is_object() {
        let exported = value
            .to_json(&mut context)
            .map_err(|e| SandboxError::Export(e.to_string()))?
            .ok_or_else(|| {
                SandboxError::Export("result is not representable as JSON".to_string())
            })?;
        return Ok(ScriptValue::Object(exported));
    }

    Err(SandboxError::Export("unsupported value type".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sandbox() -> BoaSandbox {
        BoaSandbox::default()
    }

    #[test]
    fn test_check_syntax_accepts_valid_source() {
        assert!(sandbox().check_syntax("1 + 1;").is_ok());
        assert!(sandbox().check_syntax("deps.task1 === 'done'").is_ok());
        assert!(sandbox().check_syntax("if (a > 1) { b(); }").is_ok());
    }

    #[test]
    fn test_check_syntax_rejects_invalid_source() {
        assert!(sandbox().check_syntax("if (;)").is_err());
        assert!(sandbox().check_syntax("function !!!").is_err());
    }

    #[test]
    fn test_run_number() {
        let value = sandbox().run("1 + 1;", &Bindings::none()).unwrap();
        assert_eq!(value, ScriptValue::Number(2.0));
    }

    #[test]
    fn test_run_string() {
        let value = sandbox().run("'a' + 'b';", &Bindings::none()).unwrap();
        assert_eq!(value, ScriptValue::String("ab".to_string()));
    }

    #[test]
    fn test_run_boolean_and_null() {
        assert_eq!(
            sandbox().run("true;", &Bindings::none()).unwrap(),
            ScriptValue::Bool(true)
        );
        assert_eq!(
            sandbox().run("null;", &Bindings::none()).unwrap(),
            ScriptValue::Null
        );
    }

    #[test]
    fn test_run_undefined_completion() {
        let value = sandbox().run("var x = 1;", &Bindings::none()).unwrap();
        assert_eq!(value, ScriptValue::Undefined);
    }

    #[test]
    fn test_run_object_completion() {
        let value = sandbox()
            .run("var output = { next: 'task1' }; output;", &Bindings::none())
            .unwrap();
        assert_eq!(value, ScriptValue::Object(json!({"next": "task1"})));
    }

    #[test]
    fn test_run_object_completion_needs_no_particular_binding() {
        let value = sandbox().run("({a: 1});", &Bindings::none()).unwrap();
        assert_eq!(value, ScriptValue::Object(json!({"a": 1})));

        let value = sandbox()
            .run("var result = [1, 'two']; result;", &Bindings::none())
            .unwrap();
        assert_eq!(value, ScriptValue::Object(json!([1, "two"])));
    }

    #[test]
    fn test_run_function_is_flagged() {
        let value = sandbox()
            .run("var output = function () { return 1; }; output;", &Bindings::none())
            .unwrap();
        assert_eq!(value, ScriptValue::Function);
    }

    #[test]
    fn test_run_runtime_error() {
        let err = sandbox().run("noSuchBinding + 1;", &Bindings::none()).unwrap_err();
        assert!(matches!(err, SandboxError::Runtime(_)));
    }

    #[test]
    fn test_bindings_are_injected() {
        let bindings = Bindings {
            deps: Some(json!({"task1": 40})),
            input: Some(json!({"x": 2})),
        };
        let value = sandbox().run("deps.task1 + input.x;", &bindings).unwrap();
        assert_eq!(value, ScriptValue::Number(42.0));
    }

    #[test]
    fn test_bindings_with_awkward_strings() {
        let bindings = Bindings {
            deps: None,
            input: Some(json!({"s": "he said \"hi\"\nback'slash\\"})),
        };
        let value = sandbox().run("input.s.length;", &bindings).unwrap();
        assert_eq!(value, ScriptValue::Number(24.0));
    }

    #[test]
    fn test_no_state_leaks_between_runs() {
        let sb = sandbox();
        sb.run("var leak = 5; leak;", &Bindings::none()).unwrap();
        let value = sb.run("typeof leak;", &Bindings::none()).unwrap();
        assert_eq!(value, ScriptValue::String("undefined".to_string()));
    }

    #[test]
    fn test_budget_is_enforced() {
        let sb = BoaSandbox::with_budget(Duration::from_millis(50));
        let err = sb.run("while (true) {}", &Bindings::none()).unwrap_err();
        assert!(matches!(err, SandboxError::Timeout));
    }
}
