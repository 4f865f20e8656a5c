//! Executor kinds
//!
//! A closed, tagged variant set over the executor kinds this core
//! ships. New kinds are added by extending the enum, not by runtime
//! registration.

use serde::{Deserialize, Serialize};

/// The executor kinds dispatchable by a task's executor tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorKind {
    /// The branching kind, tag `"if"`
    #[serde(rename = "if")]
    Branch,
    /// The scripted-computation kind, tag `"javascript"`
    #[serde(rename = "javascript")]
    Script,
}

impl ExecutorKind {
    /// All kinds, in declaration order
    pub const ALL: [ExecutorKind; 2] = [ExecutorKind::Branch, ExecutorKind::Script];

    /// The stable tag of this kind
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Branch => "if",
            Self::Script => "javascript",
        }
    }

    /// Resolve a tag to a kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "if" => Some(Self::Branch),
            "javascript" => Some(Self::Script),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for kind in ExecutorKind::ALL {
            assert_eq!(ExecutorKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ExecutorKind::from_tag("python"), None);
    }

    #[test]
    fn test_serde_uses_tags() {
        assert_eq!(serde_json::to_string(&ExecutorKind::Branch).unwrap(), "\"if\"");
        let kind: ExecutorKind = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(kind, ExecutorKind::Script);
    }
}
