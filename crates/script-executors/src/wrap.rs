//! Program synthesis
//!
//! User sources are never evaluated bare: they are embedded in a
//! zero-argument `main()` function, invoked once, with the result
//! assigned to the `output` binding and evaluated as the program's
//! final expression. This guarantees a well-defined completion value
//! for multi-statement bodies and keeps user-written `return` legal.

use task_contracts::{SandboxError, ScriptSandbox};

/// Name of the binding the synthesized wrapper assigns its result to.
pub const RESULT_BINDING: &str = "output";

/// Wrap a script-kind source.
///
/// If the source (trailing semicolons stripped) parses as a
/// parenthesized expression, it is returned from `main` directly, so
/// bare expressions like `1+1;` produce their value. Anything else is
/// embedded as the statement body, where the author controls `return`;
/// a body without `return` produces the empty result.
pub fn wrap_script(source: &str, sandbox: &dyn ScriptSandbox) -> String {
    let body = source.trim();
    let expr = body.trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    if !expr.is_empty() && sandbox.check_syntax(&format!("({})", expr)).is_ok() {
        format!(
            "function main() {{ return ({}); }}\nvar {} = main();\n{};",
            expr, RESULT_BINDING, RESULT_BINDING
        )
    } else {
        format!(
            "function main() {{ {} }}\nvar {} = main();\n{};",
            body, RESULT_BINDING, RESULT_BINDING
        )
    }
}

/// Wrap a branch-kind condition.
///
/// Truthy condition produces the "if" trigger, falsy the "else"
/// trigger, exposed as the `next` field of the result object.
pub fn wrap_branch(condition: &str, if_trigger: &str, else_trigger: &str) -> String {
    let if_literal = serde_json::Value::String(if_trigger.to_string()).to_string();
    let else_literal = serde_json::Value::String(else_trigger.to_string()).to_string();
    format!(
        "function main() {{ if ({}) {{ return {} }} else {{ return {} }} }}\nvar {} = {{ next: main() }};\n{};",
        condition, if_literal, else_literal, RESULT_BINDING, RESULT_BINDING
    )
}

/// Syntax-only validity check for a user source.
///
/// Accepts sources that parse either bare or inside the
/// `function main() { .. }` envelope that will actually run them, so
/// statement bodies with a top-level `return` pass. No evaluation, no
/// binding resolution.
pub fn check_source_syntax(
    source: &str,
    sandbox: &dyn ScriptSandbox,
) -> Result<(), SandboxError> {
    match sandbox.check_syntax(source) {
        Ok(()) => Ok(()),
        Err(bare_err) => sandbox
            .check_syntax(&format!("function main() {{ {} }}", source))
            .map_err(|_| bare_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::BoaSandbox;

    fn sandbox() -> BoaSandbox {
        BoaSandbox::default()
    }

    #[test]
    fn test_wrap_expression_returns_value() {
        let program = wrap_script("1+1;", &sandbox());
        assert!(program.contains("return (1+1);"));
        assert!(program.contains("var output = main();"));
    }

    #[test]
    fn test_wrap_statements_keeps_body() {
        let program = wrap_script("var a = 2; return a * 3;", &sandbox());
        assert!(program.contains("function main() { var a = 2; return a * 3; }"));
    }

    #[test]
    fn test_wrap_strips_only_trailing_semicolons() {
        let program = wrap_script("'a;b' + 'c';;", &sandbox());
        assert!(program.contains("return ('a;b' + 'c');"));
    }

    #[test]
    fn test_wrap_branch_quotes_triggers() {
        let program = wrap_branch("deps.t1 > 2", "task1", "task2");
        assert!(program.contains("if (deps.t1 > 2)"));
        assert!(program.contains("return \"task1\""));
        assert!(program.contains("return \"task2\""));
        assert!(program.contains("var output = { next: main() };"));
    }

    #[test]
    fn test_check_source_syntax_accepts_top_level_return() {
        assert!(check_source_syntax("return 1 + 1;", &sandbox()).is_ok());
    }

    #[test]
    fn test_check_source_syntax_rejects_garbage() {
        assert!(check_source_syntax("if (;)", &sandbox()).is_err());
    }
}
