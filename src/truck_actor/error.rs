use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TruckError {
    #[error("Truck not found: {0}")]
    NotFound(String),
    #[error("Truck validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
