//! Small shared building blocks used across the reactor, bus, runtime, and
//! HTTP layers.

pub mod ids;
pub mod serde_helpers;

pub use ids::{new_reply_address, DeploymentId, OpaqueId, RequestId};
pub use serde_helpers::duration_serde;
