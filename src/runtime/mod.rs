//! The Runtime: deploys components, assigns each a [`crate::reactor::Reactor`],
//! and drives the deploy/start/stop/undeploy lifecycle across the whole set.

pub mod component;
pub mod config;
pub mod context;
pub mod error;
#[allow(clippy::module_inception)]
pub mod runtime;

pub use component::Component;
pub use config::{RuntimeConfig, RuntimeConfigBuilder};
pub use context::ComponentContext;
pub use error::RuntimeError;
pub use runtime::{Runtime, RuntimeState, READINESS_ADDRESS};
