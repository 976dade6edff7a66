//! Schema definitions for the synth record generator.
//!
//! A schema is an ordered sequence of field specs. Each spec names a field
//! (optionally), says whether its output is flattened into the enclosing
//! record, and selects a sampler or constraint through its `class`.
//!
//! Schemas are read with `serde_yaml`. YAML flow syntax accepts the relaxed
//! JSON dialect schemas are usually written in (unquoted keys, single
//! quotes), so both of these load:
//!
//! ```yaml
//! - {name: a, class: int, min: 0, max: 100}
//! - {class: greater-than-constraint, att1: a, att2: b}
//! ```
//!
//! ```json
//! [{"name": "a", "class": "int", "min": 0, "max": 100}]
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors.
///
/// All of these are detected while a schema is loaded or its dependency
/// graph is built, before any record is generated.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML / JSON
    #[error("Failed to parse schema: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A constraint references a field that no ordinary sampler defines
    #[error("Constraint '{constraint}' references undefined field '{field}'")]
    UndefinedField { constraint: String, field: String },

    /// A sampler whose output is nested under its name has no name
    #[error("Field #{position} ({class}) needs a name unless it is flat")]
    MissingName { position: usize, class: String },

    /// The constraint graph contains a cycle
    #[error("Circular dependency between fields: {}", fields.join(", "))]
    DependencyCycle { fields: Vec<String> },

    /// A constraint targets a sampler that cannot honour it
    #[error("Field '{field}' ({class}) does not support {constraint}")]
    UnsupportedConstraint {
        field: String,
        class: String,
        constraint: String,
    },

    /// Sampler parameters are invalid
    #[error("Invalid parameters for field '{field}': {reason}")]
    InvalidSampler { field: String, reason: String },
}

// ============================================================================
// Field Specs
// ============================================================================

fn default_step() -> i64 {
    1
}

fn default_int_max() -> i64 {
    100
}

fn default_double_max() -> f64 {
    1.0
}

fn default_true_weight() -> f64 {
    0.5
}

fn default_date_start() -> String {
    "2000-01-01".to_string()
}

fn default_date_end() -> String {
    "2030-01-01".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_max_length() -> usize {
    5
}

/// Which parts of a person's name the `name` sampler produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameType {
    First,
    Last,
    #[default]
    FirstLast,
    LastFirst,
}

/// Candidate values for a `one-of` sampler.
///
/// Either a plain list (uniform weights) or a map from value to weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOfValues {
    List(Vec<Value>),
    Weighted(serde_json::Map<String, Value>),
}

/// Sampler or constraint selected by a field spec's `class`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "kebab-case")]
pub enum FieldClass {
    /// Incrementing integers
    Id {
        #[serde(default)]
        start: i64,
        #[serde(default = "default_step")]
        step: i64,
    },

    /// Uniform integers in `[min, max)`
    Int {
        #[serde(default)]
        min: i64,
        #[serde(default = "default_int_max")]
        max: i64,
    },

    /// Uniform floats in `[min, max)`
    Double {
        #[serde(default)]
        min: f64,
        #[serde(default = "default_double_max")]
        max: f64,
    },

    /// Weighted boolean
    Bool {
        #[serde(default = "default_true_weight")]
        true_weight: f64,
    },

    /// Selection from a list of values
    OneOf { values: OneOfValues },

    /// The same value every time
    Constant { value: Value },

    /// Random (seeded) UUID strings
    Uuid,

    /// Strings built from a pattern with `{index}` and `{rand:N}` placeholders
    Pattern { pattern: String },

    /// Person names
    Name {
        #[serde(default, rename = "type")]
        name_type: NameType,
    },

    /// Street addresses
    Address,

    /// Dates in `[start, end)` rendered with `format`
    Date {
        #[serde(default = "default_date_start")]
        start: String,
        #[serde(default = "default_date_end")]
        end: String,
        #[serde(default = "default_date_format")]
        format: String,
    },

    /// Arrays whose elements come from a nested spec
    Sequence {
        array: Box<FieldSpec>,
        /// Fixed length; overrides `min_length` / `max_length`
        #[serde(default)]
        length: Option<usize>,
        #[serde(default)]
        min_length: usize,
        #[serde(default = "default_max_length")]
        max_length: usize,
    },

    /// Objects built from a nested list of specs
    Map { value: Vec<FieldSpec> },

    /// `att1 > att2`
    GreaterThanConstraint { att1: String, att2: String },

    /// `att1 < att2`
    LowerThanConstraint { att1: String, att2: String },

    /// `att1 == att2`
    EqualsToConstraint { att1: String, att2: String },

    /// `att1` is drawn from `values[att2]`
    DependencyConstraint {
        att1: String,
        att2: String,
        values: HashMap<String, Vec<Value>>,
    },
}

impl FieldClass {
    /// The `class` discriminator as written in a schema.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Id { .. } => "id",
            Self::Int { .. } => "int",
            Self::Double { .. } => "double",
            Self::Bool { .. } => "bool",
            Self::OneOf { .. } => "one-of",
            Self::Constant { .. } => "constant",
            Self::Uuid => "uuid",
            Self::Pattern { .. } => "pattern",
            Self::Name { .. } => "name",
            Self::Address => "address",
            Self::Date { .. } => "date",
            Self::Sequence { .. } => "sequence",
            Self::Map { .. } => "map",
            Self::GreaterThanConstraint { .. } => "greater-than-constraint",
            Self::LowerThanConstraint { .. } => "lower-than-constraint",
            Self::EqualsToConstraint { .. } => "equals-to-constraint",
            Self::DependencyConstraint { .. } => "dependency-constraint",
        }
    }

    /// The `(att1, att2)` pair when this class is a constraint.
    pub fn constraint_fields(&self) -> Option<(&str, &str)> {
        match self {
            Self::GreaterThanConstraint { att1, att2 }
            | Self::LowerThanConstraint { att1, att2 }
            | Self::EqualsToConstraint { att1, att2 }
            | Self::DependencyConstraint { att1, att2, .. } => Some((att1, att2)),
            _ => None,
        }
    }
}

/// One entry of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Output field name; unnamed entries are legal when `flat` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Splice objects into the record and fan arrays out into several records
    #[serde(default)]
    pub flat: bool,

    /// Sampler or constraint configuration
    #[serde(flatten)]
    pub class: FieldClass,
}

impl FieldSpec {
    /// Create a named, non-flat spec.
    pub fn named(name: impl Into<String>, class: FieldClass) -> Self {
        Self {
            name: Some(name.into()),
            flat: false,
            class,
        }
    }

    /// Create an unnamed, flat spec.
    pub fn flat(class: FieldClass) -> Self {
        Self {
            name: None,
            flat: true,
            class,
        }
    }

    /// Whether this entry is a constraint rather than a field sampler.
    pub fn is_constraint(&self) -> bool {
        self.class.constraint_fields().is_some()
    }

    /// Human-readable label used in logs and errors.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("<{}>", self.class.class_name()),
        }
    }
}

/// An ordered list of field specs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDefinition {
    pub fields: Vec<FieldSpec>,
}

impl SchemaDefinition {
    /// Create a schema from field specs.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Load schema from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from a YAML (or JSON) string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Number of constraint entries.
    pub fn constraint_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_constraint()).count()
    }
}

// ============================================================================
// Tests
// ============================================================================
