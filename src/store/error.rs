use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
