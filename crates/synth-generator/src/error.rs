//! Error types for record generation.

/// Errors raised while a generation pass runs.
///
/// Either kind abandons the whole pass; no partial record is emitted.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// No value satisfies the sampler's bounds after constraint narrowing
    #[error("Constraint on field '{field}' cannot be satisfied: {reason}")]
    ConstraintViolation { field: String, reason: String },

    /// A flat sampler returned a value that cannot be placed in the record
    #[error("Field '{field}' produced an unusable value: {reason}")]
    Shape { field: String, reason: String },
}

impl SamplerError {
    pub(crate) fn violation(field: &str, reason: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(field: &str, reason: impl Into<String>) -> Self {
        Self::Shape {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
