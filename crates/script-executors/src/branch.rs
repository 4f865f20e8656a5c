//! Branch executor (`"if"` kind)
//!
//! Evaluates a boolean condition against upstream data and decides
//! which of two pre-declared sibling tasks runs next. The output is
//! `{ "next": <trigger> }`.

use std::sync::{Arc, OnceLock};

use log::debug;
use serde::{Deserialize, Serialize};

use task_contracts::{
    template::has_markers, Bindings, Executor, ExecutorError, FieldRules, FieldType, Result,
    RuleSet, ScriptSandbox, Siblings, Task, TemplateRenderer,
};

use crate::coerce::coerce_branch_output;
use crate::sandbox::BoaSandbox;
use crate::template::HandlebarsRenderer;
use crate::validate::apply_rules;
use crate::wrap::wrap_branch;

/// The `if` arm: a condition and the trigger chosen when it is truthy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchArm {
    /// Script expression deciding the branch
    #[serde(default)]
    pub condition: String,
    /// Sibling task ID to run when the condition is truthy
    #[serde(default)]
    pub trigger: String,
}

/// The `else` arm: the trigger chosen when the condition is falsy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElseArm {
    /// Sibling task ID to run when the condition is falsy
    #[serde(default)]
    pub trigger: String,
}

/// Converted input of the branch kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInput {
    /// The condition and its trigger
    #[serde(rename = "if", default)]
    pub if_arm: BranchArm,
    /// The fallback trigger
    #[serde(rename = "else", default)]
    pub else_arm: ElseArm,
}

impl BranchInput {
    /// Structural conversion from the raw input value.
    ///
    /// Shape only; field-level rules are applied separately.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(ExecutorError::invalid_task("Input must be an object"));
        }
        serde_json::from_value(raw.clone())
            .map_err(|e| ExecutorError::invalid_task(format!("Error converting input: {}", e)))
    }
}

/// The branch executor
pub struct BranchExecutor {
    renderer: Arc<dyn TemplateRenderer>,
    sandbox: Arc<dyn ScriptSandbox>,
    cache: OnceLock<BranchInput>,
}

impl BranchExecutor {
    /// Create a branch executor with injected collaborators
    pub fn new(renderer: Arc<dyn TemplateRenderer>, sandbox: Arc<dyn ScriptSandbox>) -> Self {
        Self {
            renderer,
            sandbox,
            cache: OnceLock::new(),
        }
    }

    /// Convert the task's input, memoized for this instance's lifetime.
    ///
    /// Conversion itself is pure; the write-once cell only caches its
    /// result so `validate` and `execute` share one converted form.
    fn converted(&self, task: &Task) -> Result<&BranchInput> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }
        let raw = task
            .input
            .as_ref()
            .ok_or_else(|| ExecutorError::invalid_task("Input is required"))?;
        let parsed = BranchInput::from_value(raw)?;
        Ok(self.cache.get_or_init(|| parsed))
    }
}

impl Default for BranchExecutor {
    fn default() -> Self {
        Self::new(
            Arc::new(HandlebarsRenderer::new()),
            Arc::new(BoaSandbox::default()),
        )
    }
}

impl Executor for BranchExecutor {
    fn id(&self) -> &'static str {
        "if"
    }

    fn name(&self) -> &'static str {
        "If"
    }

    fn description(&self) -> &'static str {
        "Evaluates a comparison against upstream data and decides the next task to execute."
    }

    fn input_rules(&self) -> RuleSet {
        RuleSet::new(vec![
            FieldRules::new("if", FieldType::Object).required(),
            FieldRules::new("if.condition", FieldType::String).required().valid_script(),
            FieldRules::new("if.trigger", FieldType::String).required().alphanum(),
            FieldRules::new("else", FieldType::Object).required(),
            FieldRules::new("else.trigger", FieldType::String).required().alphanum(),
        ])
    }

    fn output_rules(&self) -> RuleSet {
        RuleSet::new(vec![FieldRules::new("next", FieldType::String)
            .required()
            .alphanum()])
    }

    fn validate(&self, task: &Task, siblings: &Siblings) -> Result<()> {
        let input = self.converted(task)?;

        let as_value = serde_json::to_value(input)
            .map_err(|e| ExecutorError::invalid_task(format!("Error converting input: {}", e)))?;
        apply_rules(&self.input_rules(), &as_value, self.sandbox.as_ref())?;

        // Static graph-shape check, independent of runtime readiness.
        if !siblings.contains(&input.if_arm.trigger) {
            return Err(ExecutorError::invalid_task(format!(
                "If trigger {} does not exist in the workflow",
                input.if_arm.trigger
            )));
        }
        if !siblings.contains(&input.else_arm.trigger) {
            return Err(ExecutorError::invalid_task(format!(
                "Else trigger {} does not exist in the workflow",
                input.else_arm.trigger
            )));
        }
        Ok(())
    }

    fn execute(&self, task: &Task, siblings: &Siblings) -> Result<serde_json::Value> {
        debug!("Executing task {} in the branch executor", task.id);
        let input = self.converted(task)?;

        // Render before wrapping; triggers are alphanumeric and never
        // carry placeholders.
        let mut condition = input.if_arm.condition.clone();
        if has_markers(&condition) {
            condition = self.renderer.render(&condition, task, siblings)?;
        }

        let program = wrap_branch(&condition, &input.if_arm.trigger, &input.else_arm.trigger);
        let value = self.sandbox.run(&program, &Bindings::for_task(task))?;
        coerce_branch_output(value)
    }

    fn fresh(&self) -> Box<dyn Executor> {
        Box::new(Self::new(Arc::clone(&self.renderer), Arc::clone(&self.sandbox)))
    }
}
