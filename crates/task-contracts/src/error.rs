//! Error types for the executor core

use thiserror::Error;

use crate::sandbox::SandboxError;

/// Result type alias using ExecutorError
pub type Result<T> = std::result::Result<T, ExecutorError>;

/// Errors that can occur while validating or executing a task
///
/// `InvalidTask` and `InvalidInput` are discoverable before execution
/// and are surfaced to the workflow author; they are never retried.
/// `ExecutionFailed` and `Timeout` mark the single task as failed and
/// leave retry policy to the host scheduler.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Structural, shape, or referential problem with the task
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Shape problem with the task's raw input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Script evaluation or output coercion failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The wall-clock execution budget was exceeded
    #[error("Execution exceeded the wall-clock budget")]
    Timeout,

    /// Template rendering failed (propagated from the collaborator)
    #[error("Template error: {0}")]
    Template(String),
}

impl From<SandboxError> for ExecutorError {
    fn from(err: SandboxError) -> Self {
        match err {
            SandboxError::Timeout => Self::Timeout,
            other => Self::failed(format!("Error executing script: {}", other)),
        }
    }
}

impl ExecutorError {
    /// Create an invalid-task error with a message
    pub fn invalid_task(msg: impl Into<String>) -> Self {
        Self::InvalidTask(msg.into())
    }

    /// Create an invalid-input error with a message
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an execution-failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// True for failures a workflow author must fix before the
    /// workflow can be accepted
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidTask(_) | Self::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = ExecutorError::invalid_task("Input is required");
        assert_eq!(err.to_string(), "Invalid task: Input is required");

        let err = ExecutorError::failed("Error executing script: boom");
        assert_eq!(err.to_string(), "Execution failed: Error executing script: boom");
    }

    #[test]
    fn test_is_validation() {
        assert!(ExecutorError::invalid_task("x").is_validation());
        assert!(ExecutorError::invalid_input("x").is_validation());
        assert!(!ExecutorError::failed("x").is_validation());
        assert!(!ExecutorError::Timeout.is_validation());
    }

    #[test]
    fn test_sandbox_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            ExecutorError::from(SandboxError::Timeout),
            ExecutorError::Timeout
        ));
        let err = ExecutorError::from(SandboxError::Runtime("x is not defined".to_string()));
        assert!(err.to_string().contains("Error executing script"));
        assert!(err.to_string().contains("x is not defined"));
    }
}
