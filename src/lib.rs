//! synth: generate synthetic records from a declarative schema.
//!
//! The heavy lifting lives in the workspace crates:
//!
//! - `synth-core` - schema definition types and the value model
//! - `synth-generator` - the record generation engine
//! - `synth-populate` - JSONL / CSV file writers
//!
//! This crate wires them into the `synth` command-line tool.

pub mod generate;

pub use generate::{run_fields, run_generate};
