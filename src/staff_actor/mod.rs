//! Back-office staff accounts, served by a generic resource actor.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
