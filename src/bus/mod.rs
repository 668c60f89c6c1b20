//! The Event Bus: address-keyed `publish`/`send`/`request`, routed onto the
//! correct reactor so each component keeps its single-threaded programming
//! model even though the bus itself is concurrent.

pub mod error;
#[allow(clippy::module_inception)]
pub mod event_bus;
pub mod subscription;

pub use error::BusError;
pub use event_bus::EventBus;
pub use subscription::{Handler, HandlerFuture, Subscription};
