//! Ordering core of a food-truck network: pickup scheduling, cart and order
//! lifecycle, reporting, notifications and back-office collections.
//!
//! Every stateful component is a tokio actor ("Service") reached through a
//! cloneable handle ("Client"). [`TruckSystem`](app_system::TruckSystem)
//! starts them all and shuts them down.

#[macro_use]
pub mod clients;

pub mod actor_framework;
pub mod app_system;
pub mod config;
pub mod domain;
pub mod notifier;
pub mod persistence;
pub mod reporting;
pub mod schedule;
pub mod staff_actor;
pub mod store;
pub mod truck_actor;

#[cfg(test)]
mod mock_framework;
