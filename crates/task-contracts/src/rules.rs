//! Field rule metadata for input/output schemas
//!
//! Executors advertise their input and output contracts as a
//! [`RuleSet`]: a list of dotted field paths with data types and
//! declarative constraints. The same rule set that authoring tooling
//! consumes also drives validate-time rule application, so there is a
//! single source of truth per executor kind.

use serde::{Deserialize, Serialize};

/// The data type expected at a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text string
    String,
    /// JSON object
    Object,
    /// Boolean value
    Boolean,
    /// Numeric value
    Number,
    /// Accepts any type
    Any,
}

/// A declarative constraint on a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// The field must be present and non-empty
    Required,
    /// The value must match the alphanumeric identifier grammar
    Alphanum,
    /// The value must parse as syntactically valid script source
    /// (syntax only, no evaluation)
    ValidScript,
}

/// Rules for a single field, addressed by dotted path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRules {
    /// Dotted field path (e.g. `if.condition`)
    pub field: String,
    /// Expected data type
    pub data_type: FieldType,
    /// Constraints applied in order
    pub constraints: Vec<Constraint>,
}

impl FieldRules {
    /// Create rules for a field with no constraints
    pub fn new(field: impl Into<String>, data_type: FieldType) -> Self {
        Self {
            field: field.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    /// Add the `Required` constraint
    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::Required);
        self
    }

    /// Add the `Alphanum` constraint
    pub fn alphanum(mut self) -> Self {
        self.constraints.push(Constraint::Alphanum);
        self
    }

    /// Add the `ValidScript` constraint
    pub fn valid_script(mut self) -> Self {
        self.constraints.push(Constraint::ValidScript);
        self
    }
}

/// The advertised schema of an executor's input or output shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Per-field rules
    pub fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Build a rule set from field rules
    pub fn new(fields: Vec<FieldRules>) -> Self {
        Self { fields }
    }

    /// Look up the rules for a field path
    pub fn field(&self, path: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|f| f.field == path)
    }
}
