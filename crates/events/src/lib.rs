//! Change notifications: event contract + pub/sub transport.
//!
//! The inventory store publishes one event per successful mutation; any
//! rendering layer subscribes and re-renders (or streams) on receipt.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
