//! Core types for the synth record generator.
//!
//! This crate provides the foundational types shared by the generation
//! engine and the output drivers:
//!
//! - [`Value`] / [`Record`] - The tree-shaped value produced by every sampler
//! - [`FieldSpec`] / [`FieldClass`] - One entry of a schema definition
//! - [`SchemaDefinition`] - An ordered list of field specs loaded from YAML or JSON
//! - [`SchemaError`] - Configuration errors detected before any sampling begins
//!
//! # Architecture
//!
//! ```text
//! synth-core (this crate)
//!    │
//!    ├─── synth-generator  (samplers, dependency graph, record assembly)
//!    │
//!    └─── synth-populate   (writes JSON-lines / CSV files from a generator)
//! ```
//!
//! # Example
//!
//! ```rust
//! use synth_core::SchemaDefinition;
//!
//! let schema = SchemaDefinition::from_yaml(r#"
//! - {name: id, class: id}
//! - {name: age, class: int, min: 18, max: 80}
//! "#).unwrap();
//!
//! assert_eq!(schema.fields.len(), 2);
//! ```

pub mod schema;
pub mod value;

// Re-exports for convenience
pub use schema::{FieldClass, FieldSpec, NameType, OneOfValues, SchemaDefinition, SchemaError};
pub use value::{compare_values, value_key, Record, Value};
