//! Error types for the file populator.

use thiserror::Error;

/// Errors that can occur while writing generated records.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Schema could not be loaded.
    #[error("Schema error: {0}")]
    Schema(#[from] synth_core::SchemaError),

    /// A generation pass failed.
    #[error("Generator error: {0}")]
    Sampler(#[from] synth_generator::SamplerError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
