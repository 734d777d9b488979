//! Order lifecycle store: cart, city/slot selection, order history and catalog.

pub mod error;
pub mod messages;
pub mod scheduler;
pub mod service;
pub mod state;

pub use error::*;
pub use messages::{StoreEvent, StoreRequest};
pub use service::{StoreService, TransitionDelays};
pub use state::{AppState, SCHEMA_VERSION};
