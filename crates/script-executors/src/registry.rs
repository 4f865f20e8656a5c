//! Executor registry
//!
//! Builds fresh, cache-isolated executor instances per kind. The
//! registry owns the shared stateless collaborators (template
//! renderer, script sandbox) and hands every created instance its own
//! empty converted-input cache, so one task's evaluation can never
//! leak into another's.

use std::sync::Arc;

use task_contracts::{Executor, ScriptSandbox, TemplateRenderer};

use crate::branch::BranchExecutor;
use crate::javascript::ScriptExecutor;
use crate::kind::ExecutorKind;
use crate::sandbox::BoaSandbox;
use crate::template::HandlebarsRenderer;

/// Factory over the closed executor kind set
pub struct ExecutorRegistry {
    renderer: Arc<dyn TemplateRenderer>,
    sandbox: Arc<dyn ScriptSandbox>,
}

impl ExecutorRegistry {
    /// Registry with the default collaborators
    pub fn new() -> Self {
        Self {
            renderer: Arc::new(HandlebarsRenderer::new()),
            sandbox: Arc::new(BoaSandbox::default()),
        }
    }

    /// Swap in a different template renderer
    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Swap in a different script sandbox
    pub fn with_sandbox(mut self, sandbox: Arc<dyn ScriptSandbox>) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Create a fresh executor for a kind
    pub fn create(&self, kind: ExecutorKind) -> Box<dyn Executor> {
        match kind {
            ExecutorKind::Branch => Box::new(BranchExecutor::new(
                Arc::clone(&self.renderer),
                Arc::clone(&self.sandbox),
            )),
            ExecutorKind::Script => Box::new(ScriptExecutor::new(
                Arc::clone(&self.renderer),
                Arc::clone(&self.sandbox),
            )),
        }
    }

    /// Create a fresh executor for a task's executor tag
    pub fn create_for_tag(&self, tag: &str) -> Option<Box<dyn Executor>> {
        ExecutorKind::from_tag(tag).map(|kind| self.create(kind))
    }

    /// The kinds this registry can build
    pub fn kinds(&self) -> &'static [ExecutorKind] {
        &ExecutorKind::ALL
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
