//! Script Executors
//!
//! The branching and scripted-computation core of the workflow
//! engine. Given a single task node, it decides whether the node's
//! declared input is well-formed and referentially consistent with
//! its siblings, and what value the node produces when executed —
//! including, for the branch kind, which sibling runs next.
//!
//! # Kinds
//!
//! - **Branch** (`"if"`): evaluates a boolean condition and returns
//!   `{ "next": <trigger> }` naming one of two pre-declared triggers
//! - **Script** (`"javascript"`): evaluates an arbitrary expression
//!   and returns its coerced value
//!
//! # Pipeline
//!
//! Typed input conversion (cached per instance) → declarative field
//! rules and referential checks → template expansion → program
//! synthesis → sandboxed evaluation → result coercion.

pub mod branch;
pub mod coerce;
pub mod javascript;
pub mod kind;
pub mod registry;
pub mod sandbox;
pub mod template;
pub mod validate;
pub mod wrap;

pub use branch::{BranchArm, BranchExecutor, BranchInput, ElseArm};
pub use javascript::{ScriptExecutor, ScriptInput};
pub use kind::ExecutorKind;
pub use registry::ExecutorRegistry;
pub use sandbox::{BoaSandbox, SandboxConfig};
pub use template::HandlebarsRenderer;

// Re-export contract types that hosts will need
pub use task_contracts::{
    Bindings, Constraint, Executor, ExecutorError, FieldRules, FieldType, Result, RuleSet,
    SandboxError, ScriptSandbox, ScriptValue, Siblings, Task, TaskId, TemplateRenderer,
};
