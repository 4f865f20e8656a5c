//! Script executor (`"javascript"` kind)
//!
//! Evaluates an arbitrary user-authored expression or statement body
//! against upstream data and returns its coerced value.

use std::sync::{Arc, OnceLock};

use log::debug;
use serde::{Deserialize, Serialize};

use task_contracts::{
    template::has_markers, Bindings, Executor, ExecutorError, FieldRules, FieldType, Result,
    RuleSet, ScriptSandbox, Siblings, Task, TemplateRenderer,
};

use crate::coerce::coerce_script_output;
use crate::sandbox::BoaSandbox;
use crate::template::HandlebarsRenderer;
use crate::validate::apply_rules;
use crate::wrap::wrap_script;

/// Converted input of the script kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptInput {
    /// The script source to evaluate
    pub source: String,
}

impl ScriptInput {
    /// Structural conversion from the raw input value.
    ///
    /// The raw input of this kind is the source string itself.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self> {
        match raw {
            serde_json::Value::String(source) => Ok(Self {
                source: source.clone(),
            }),
            _ => Err(ExecutorError::invalid_input("Input must be a string")),
        }
    }
}

/// The script executor
pub struct ScriptExecutor {
    renderer: Arc<dyn TemplateRenderer>,
    sandbox: Arc<dyn ScriptSandbox>,
    cache: OnceLock<ScriptInput>,
}

impl ScriptExecutor {
    /// Create a script executor with injected collaborators
    pub fn new(renderer: Arc<dyn TemplateRenderer>, sandbox: Arc<dyn ScriptSandbox>) -> Self {
        Self {
            renderer,
            sandbox,
            cache: OnceLock::new(),
        }
    }

    /// Convert the task's input, memoized for this instance's lifetime.
    fn converted(&self, task: &Task) -> Result<&ScriptInput> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }
        let raw = task
            .input
            .as_ref()
            .ok_or_else(|| ExecutorError::invalid_task("Input is required"))?;
        let parsed = ScriptInput::from_value(raw)?;
        Ok(self.cache.get_or_init(|| parsed))
    }
}

impl Default for ScriptExecutor {
    fn default() -> Self {
        Self::new(
            Arc::new(HandlebarsRenderer::new()),
            Arc::new(BoaSandbox::default()),
        )
    }
}

impl Executor for ScriptExecutor {
    fn id(&self) -> &'static str {
        "javascript"
    }

    fn name(&self) -> &'static str {
        "Javascript"
    }

    fn description(&self) -> &'static str {
        "Evaluates a javascript expression against upstream data and returns its value."
    }

    fn input_rules(&self) -> RuleSet {
        RuleSet::new(vec![FieldRules::new("source", FieldType::String)
            .required()
            .valid_script()])
    }

    fn output_rules(&self) -> RuleSet {
        RuleSet::new(vec![FieldRules::new("result", FieldType::Any)])
    }

    fn validate(&self, task: &Task, _siblings: &Siblings) -> Result<()> {
        let input = self.converted(task)?;

        let as_value = serde_json::to_value(input)
            .map_err(|e| ExecutorError::invalid_task(format!("Error converting input: {}", e)))?;
        // This kind reports its simpler shape problems as invalid input.
        apply_rules(&self.input_rules(), &as_value, self.sandbox.as_ref()).map_err(
            |e| match e {
                ExecutorError::InvalidTask(msg) => ExecutorError::InvalidInput(msg),
                other => other,
            },
        )
    }

    fn execute(&self, task: &Task, siblings: &Siblings) -> Result<serde_json::Value> {
        debug!("Executing task {} in the script executor", task.id);
        let input = self.converted(task)?;
        if input.source.trim().is_empty() {
            return Err(ExecutorError::invalid_input("Source is required"));
        }

        // Render before wrapping, so placeholder text can never collide
        // with the main() envelope.
        let mut source = input.source.clone();
        if has_markers(&source) {
            source = self.renderer.render(&source, task, siblings)?;
        }

        let program = wrap_script(&source, self.sandbox.as_ref());
        let value = self.sandbox.run(&program, &Bindings::for_task(task))?;
        coerce_script_output(value)
    }

    fn fresh(&self) -> Box<dyn Executor> {
        Box::new(Self::new(Arc::clone(&self.renderer), Arc::clone(&self.sandbox)))
    }
}
