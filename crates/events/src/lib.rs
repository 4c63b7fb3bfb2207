//! Domain events and their in-process distribution.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::EventHandler;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
