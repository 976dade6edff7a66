//! File populator for synth.
//!
//! Writes a fixed number of generated records to a JSON-lines or CSV file.
//! Every output file is driven by its own [`synth_generator::SchemaSampler`],
//! so several files can be written concurrently.
//!
//! # Example
//!
//! ```ignore
//! use synth_core::SchemaDefinition;
//! use synth_populate::{OutputFormat, Populator};
//!
//! let schema = SchemaDefinition::from_file("schema.yaml")?;
//! let mut populator = Populator::new(&schema, 42, OutputFormat::Jsonl)?;
//!
//! let metrics = populator.populate("output.jsonl", 1000)?;
//! println!("Generated {} records in {:?}", metrics.records_written, metrics.total_duration);
//! ```

pub mod args;
pub mod error;
pub mod populator;

pub use args::{GenerateArgs, OutputFormat, SchemaArgs};
pub use error::PopulateError;
pub use populator::{output_path, PopulateMetrics, Populator};
