//! Handlebars-backed template renderer
//!
//! Default implementation of the [`TemplateRenderer`] collaborator.
//! Placeholders resolve against a JSON context with the task's
//! dependency outputs under `deps` and the workflow's global input
//! under `input`, mirroring the bindings scripts see at run time.

use handlebars::Handlebars;
use serde_json::json;

use task_contracts::{ExecutorError, Result, Siblings, Task, TemplateRenderer};

/// Template renderer over handlebars
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a renderer configured for script source expansion
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Script source is not HTML; escaping would corrupt it.
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, source: &str, task: &Task, _siblings: &Siblings) -> Result<String> {
        let context = json!({
            "deps": task.dependencies.as_ref().map(|d| json!(d)).unwrap_or(json!({})),
            "input": task.global_input.clone().unwrap_or(serde_json::Value::Null),
        });
        self.handlebars
            .render_template(source, &context)
            .map_err(|e| ExecutorError::Template(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn task_with_context() -> Task {
        let mut deps = HashMap::new();
        deps.insert("task1".to_string(), json!("done"));
        Task::new("t", "javascript")
            .with_dependencies(deps)
            .with_global_input(json!({"x": 5}))
    }

    #[test]
    fn test_renders_global_input() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer
            .render("{{input.x}} + 1", &task_with_context(), &Siblings::default())
            .unwrap();
        assert_eq!(out, "5 + 1");
    }

    #[test]
    fn test_renders_dependency_outputs() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer
            .render("'{{deps.task1}}' === 'done'", &task_with_context(), &Siblings::default())
            .unwrap();
        assert_eq!(out, "'done' === 'done'");
    }

    #[test]
    fn test_no_escaping_of_script_source() {
        let renderer = HandlebarsRenderer::new();
        let task = Task::new("t", "javascript").with_global_input(json!({"s": "a<b&c"}));
        let out = renderer
            .render("'{{input.s}}'", &task, &Siblings::default())
            .unwrap();
        assert_eq!(out, "'a<b&c'");
    }

    #[test]
    fn test_unknown_placeholder_renders_empty() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer
            .render("[{{input.missing}}]", &task_with_context(), &Siblings::default())
            .unwrap();
        assert_eq!(out, "[]");
    }
}
