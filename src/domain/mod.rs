//! Business domain entities. Pure data structures with no actor-specific concerns.

pub mod cart;
pub mod city;
pub mod order;
pub mod product;
pub mod schedule;
pub mod staff;
pub mod truck;

pub use cart::*;
pub use city::*;
pub use order::*;
pub use product::*;
pub use schedule::*;
pub use staff::*;
pub use truck::*;
