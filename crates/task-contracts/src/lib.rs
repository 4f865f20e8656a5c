//! Task Contracts
//!
//! Data model and capability contracts for the branching and
//! scripted-computation executor core. This crate defines WHAT an
//! executor is and what it consumes; the concrete engine lives in
//! `script-executors`.
//!
//! # Contents
//!
//! - **Task model**: [`Task`], [`Siblings`] — the host-owned task node
//!   and the sibling view used for referential checks
//! - **Errors**: [`ExecutorError`] — the failure taxonomy shared by
//!   validation and execution
//! - **Rules**: [`RuleSet`], [`FieldRules`] — machine-readable
//!   input/output schemas for authoring tooling and validation
//! - **Capability trait**: [`Executor`] — identity, schemas, validate,
//!   execute, and the fresh-instance factory
//! - **Collaborator seams**: [`TemplateRenderer`], [`ScriptSandbox`] —
//!   injected dependencies the host may swap out

pub mod error;
pub mod executor;
pub mod rules;
pub mod sandbox;
pub mod task;
pub mod template;

pub use error::{ExecutorError, Result};
pub use executor::Executor;
pub use rules::{Constraint, FieldRules, FieldType, RuleSet};
pub use sandbox::{Bindings, SandboxError, ScriptSandbox, ScriptValue};
pub use task::{Siblings, Task, TaskId};
pub use template::TemplateRenderer;
