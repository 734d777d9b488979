//! Fleet management: trucks, their home city and map position.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
