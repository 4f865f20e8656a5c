//! Declarative field rule application
//!
//! Walks an executor's advertised [`RuleSet`] against the converted
//! input, enforcing each constraint in order and short-circuiting on
//! the first failure. The same rule set is what `input_rules()`
//! advertises to authoring tooling.

use task_contracts::{Constraint, ExecutorError, Result, RuleSet, ScriptSandbox};

use crate::wrap::check_source_syntax;

/// Apply every rule in `rules` to `input`, a JSON rendering of the
/// converted input.
pub fn apply_rules(
    rules: &RuleSet,
    input: &serde_json::Value,
    sandbox: &dyn ScriptSandbox,
) -> Result<()> {
    for field in &rules.fields {
        let value = lookup(input, &field.field);
        for constraint in &field.constraints {
            check_constraint(&field.field, value, *constraint, sandbox)?;
        }
    }
    Ok(())
}

fn check_constraint(
    field: &str,
    value: Option<&serde_json::Value>,
    constraint: Constraint,
    sandbox: &dyn ScriptSandbox,
) -> Result<()> {
    match constraint {
        Constraint::Required => {
            let present = match value {
                None | Some(serde_json::Value::Null) => false,
                Some(serde_json::Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(ExecutorError::invalid_task(format!(
                    "Input validation failed: {} is required",
                    field
                )));
            }
        }
        Constraint::Alphanum => {
            if let Some(value) = value {
                let ok = value
                    .as_str()
                    .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()));
                if !ok {
                    return Err(ExecutorError::invalid_task(format!(
                        "Input validation failed: {} must be alphanumeric",
                        field
                    )));
                }
            }
        }
        Constraint::ValidScript => {
            if let Some(value) = value {
                let source = value.as_str().ok_or_else(|| {
                    ExecutorError::invalid_task(format!(
                        "Input validation failed: {} must be a string",
                        field
                    ))
                })?;
                check_source_syntax(source, sandbox).map_err(|e| {
                    ExecutorError::invalid_task(format!(
                        "Input validation failed: {} is not valid script: {}",
                        field, e
                    ))
                })?;
            }
        }
    }
    Ok(())
}

/// Resolve a dotted field path inside a JSON value.
fn lookup<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::BoaSandbox;
    use serde_json::json;
    use task_contracts::{FieldRules, FieldType};

    fn branch_rules() -> RuleSet {
        RuleSet::new(vec![
            FieldRules::new("if.condition", FieldType::String).required().valid_script(),
            FieldRules::new("if.trigger", FieldType::String).required().alphanum(),
            FieldRules::new("else.trigger", FieldType::String).required().alphanum(),
        ])
    }

    #[test]
    fn test_valid_input_passes() {
        let input = json!({
            "if": {"condition": "deps.a > 1", "trigger": "task1"},
            "else": {"trigger": "task2"}
        });
        assert!(apply_rules(&branch_rules(), &input, &BoaSandbox::default()).is_ok());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let input = json!({"if": {"condition": "true", "trigger": "task1"}});
        let err = apply_rules(&branch_rules(), &input, &BoaSandbox::default()).unwrap_err();
        assert!(err.to_string().contains("else.trigger is required"));
    }

    #[test]
    fn test_empty_string_is_not_present() {
        let input = json!({
            "if": {"condition": "", "trigger": "task1"},
            "else": {"trigger": "task2"}
        });
        let err = apply_rules(&branch_rules(), &input, &BoaSandbox::default()).unwrap_err();
        assert!(err.to_string().contains("if.condition is required"));
    }

    #[test]
    fn test_non_alphanumeric_trigger_fails() {
        let input = json!({
            "if": {"condition": "true", "trigger": "task-1"},
            "else": {"trigger": "task2"}
        });
        let err = apply_rules(&branch_rules(), &input, &BoaSandbox::default()).unwrap_err();
        assert!(err.to_string().contains("if.trigger must be alphanumeric"));
    }

    #[test]
    fn test_invalid_script_fails_without_evaluation() {
        let input = json!({
            // Syntactically broken; never evaluated.
            "if": {"condition": "if (;)", "trigger": "task1"},
            "else": {"trigger": "task2"}
        });
        let err = apply_rules(&branch_rules(), &input, &BoaSandbox::default()).unwrap_err();
        assert!(err.to_string().contains("if.condition is not valid script"));
    }

    #[test]
    fn test_semantically_unresolvable_script_still_passes() {
        // Syntax-only: unknown bindings are a runtime concern.
        let input = json!({
            "if": {"condition": "noSuchThing.at.all > 1", "trigger": "task1"},
            "else": {"trigger": "task2"}
        });
        assert!(apply_rules(&branch_rules(), &input, &BoaSandbox::default()).is_ok());
    }
}
