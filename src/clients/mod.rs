//! Cloneable handles to the actors.

#[macro_use]
mod macros;

pub mod staff_client;
pub mod store_client;
pub mod truck_client;

pub use staff_client::*;
pub use store_client::*;
pub use truck_client::*;
