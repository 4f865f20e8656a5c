//! Task node data model
//!
//! A [`Task`] is one unit of work declared in a workflow graph. It is
//! owned by the host and read-only from the executor core's
//! perspective during one invocation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier of a task node within a workflow
pub type TaskId = String;

/// One task node of a workflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier within the workflow graph
    pub id: TaskId,
    /// Tag selecting the executor kind that handles this task
    pub executor: String,
    /// Untyped, author-supplied input payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    /// Outputs of upstream tasks, keyed by task ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<HashMap<TaskId, serde_json::Value>>,
    /// The workflow's original invocation payload, shared read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_input: Option<serde_json::Value>,
}

impl Task {
    /// Create a task with an ID and executor tag
    pub fn new(id: impl Into<TaskId>, executor: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            executor: executor.into(),
            input: None,
            dependencies: None,
            global_input: None,
        }
    }

    /// Set the raw input payload
    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Set the resolved upstream outputs
    pub fn with_dependencies(mut self, deps: HashMap<TaskId, serde_json::Value>) -> Self {
        self.dependencies = Some(deps);
        self
    }

    /// Set the workflow's global input
    pub fn with_global_input(mut self, input: serde_json::Value) -> Self {
        self.global_input = Some(input);
        self
    }
}

/// Borrowed view over the sibling tasks declared in the same workflow
///
/// Used only for existence lookups by ID during validation. Existence
/// in this set, not runtime readiness, is what gets checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Siblings<'a> {
    tasks: &'a [Task],
}

impl<'a> Siblings<'a> {
    /// Wrap a slice of sibling tasks
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    /// Look up a sibling task by ID
    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Check whether a sibling with the given ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of declared siblings
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no siblings are declared
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate over the declared siblings in order
    pub fn iter(&self) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter()
    }
}

impl<'a> From<&'a [Task]> for Siblings<'a> {
    fn from(tasks: &'a [Task]) -> Self {
        Self::new(tasks)
    }
}

impl<'a> From<&'a Vec<Task>> for Siblings<'a> {
    fn from(tasks: &'a Vec<Task>) -> Self {
        Self::new(tasks.as_slice())
    }
}
