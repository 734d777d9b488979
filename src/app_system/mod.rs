//! System orchestration, startup, and shutdown logic.

pub mod logging;
pub mod truck_system;

pub use logging::*;
pub use truck_system::*;
