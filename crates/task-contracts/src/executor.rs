//! The executor capability trait
//!
//! Both node kinds (branch and script) are independent implementations
//! of one shared capability set: identity, advertised schemas, a
//! pre-run `validate`, a `run`-time `execute`, and a factory producing
//! a fresh, cache-isolated instance.

use crate::error::Result;
use crate::rules::RuleSet;
use crate::task::{Siblings, Task};

/// One executor kind's capability surface
///
/// The host calls `validate` once per task before the workflow runs,
/// then `execute` when the task's dependencies are satisfied. One
/// instance serves exactly one task for its full validate+execute
/// lifetime; `fresh` produces a new instance whose converted-input
/// cache is empty. Instances must never share mutable cache state.
pub trait Executor: Send + Sync {
    /// Stable identifier of the executor kind (e.g. `"if"`)
    fn id(&self) -> &'static str;

    /// Human-facing name
    fn name(&self) -> &'static str;

    /// Human-facing description
    fn description(&self) -> &'static str;

    /// Machine-readable contract of the expected input shape
    fn input_rules(&self) -> RuleSet;

    /// Machine-readable contract of the produced output shape
    fn output_rules(&self) -> RuleSet;

    /// Check the task's declared input for structural and referential
    /// consistency against the sibling set
    fn validate(&self, task: &Task, siblings: &Siblings) -> Result<()>;

    /// Run the task and produce its output value
    fn execute(&self, task: &Task, siblings: &Siblings) -> Result<serde_json::Value>;

    /// Produce a fresh, cache-isolated instance for another task
    fn fresh(&self) -> Box<dyn Executor>;
}
