//! Task lifecycle event system.
//!
//! This crate provides the broadcast bus and event types a UI layer
//! subscribes to while peek runs are in flight.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
