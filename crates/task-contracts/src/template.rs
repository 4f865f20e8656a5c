//! Template renderer contract
//!
//! Placeholder expansion (`{{ }}` markers) is an external
//! collaborator. Executors call it on raw script source before any
//! wrapping, only when a marker is present.

use crate::error::Result;
use crate::task::{Siblings, Task};

/// Expands `{{ }}` placeholders in script source
///
/// The context available to placeholders is the task's dependency
/// outputs (`deps`) and the workflow's global input (`input`).
pub trait TemplateRenderer: Send + Sync {
    /// Render `source`, substituting placeholders from the task's
    /// dependency outputs and global input
    fn render(&self, source: &str, task: &Task, siblings: &Siblings) -> Result<String>;
}

/// Marker that triggers template expansion
pub const TEMPLATE_MARKER: &str = "{{";

/// Check whether a source string contains placeholder markers
pub fn has_markers(source: &str) -> bool {
    source.contains(TEMPLATE_MARKER)
}
