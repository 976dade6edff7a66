//! Schema-driven record generation engine for synth.
//!
//! A [`SchemaSampler`] turns a [`synth_core::SchemaDefinition`] into an
//! infinite stream of records. Cross-field constraints decide the order in
//! which fields are sampled; flat array fields fan a single generation pass
//! out into one record per combination of their elements.
//!
//! # Architecture
//!
//! ```text
//! SchemaDefinition (YAML / JSON)
//!        │
//!        ▼
//! ┌──────────────────────┐      ┌─────────────────┐
//! │  FieldSampler × n    │─────▶│ DependencyGraph │── topological order
//! │  Constraint × m      │      └─────────────────┘
//! └──────────┬───────────┘
//!            │ one pass: sample each field once
//!            ▼
//!   record + array generators ──▶ cross_product ──▶ FIFO buffer ──▶ sample()
//! ```
//!
//! # Example
//!
//! ```rust
//! use synth_core::SchemaDefinition;
//! use synth_generator::SchemaSampler;
//!
//! let schema = SchemaDefinition::from_yaml(r#"
//! - {name: id, class: id}
//! - {name: low, class: int, min: 0, max: 50}
//! - {name: high, class: int, min: 0, max: 100}
//! - {class: greater-than-constraint, att1: high, att2: low}
//! "#).unwrap();
//!
//! let mut sampler = SchemaSampler::new(&schema, 42).unwrap();
//! let record = sampler.sample().unwrap();
//! assert!(record["high"].as_i64() > record["low"].as_i64());
//! ```
//!
//! # Samplers
//!
//! - `id` - Incrementing integers
//! - `int` / `double` - Uniform numbers in `[min, max)`
//! - `bool` - Weighted booleans
//! - `one-of` - Selection from a list or a value → weight map
//! - `constant` - A fixed value
//! - `uuid` - Seeded UUID v4 strings
//! - `pattern` - Strings with `{index}`, `{uuid}` and `{rand:N}` placeholders
//! - `name` / `address` - Drawn from bundled frequency tables
//! - `date` - Dates in a range with a strftime format
//! - `sequence` - Arrays of a nested sampler's values
//! - `map` - Objects of nested samplers

pub mod bounds;
pub mod constraint;
pub mod error;
pub mod expand;
pub mod field;
pub mod graph;
pub mod samplers;
pub mod schema_sampler;

// Re-exports for convenience
pub use bounds::{Bounds, Unsatisfiable};
pub use constraint::{Constraint, ConstraintKind, Narrowing};
pub use error::SamplerError;
pub use expand::{cross_product, FieldKey};
pub use field::{derive_seed, FieldSampler};
pub use graph::DependencyGraph;
pub use schema_sampler::SchemaSampler;
