use thiserror::Error;

/// Errors that can occur during staff operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StaffError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
