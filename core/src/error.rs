use crate::types::FieldError;

/// Storage failures are not domain errors; the server carries them separately.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// No row has the requested id.
    #[error("Todo with id {id} not found")]
    NotFound { id: i64 },

    /// The request did not match the input shape.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
}
