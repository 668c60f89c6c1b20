// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::bus::BusError;
use crate::reactor::ReactorError;

/// Errors returned by [`crate::runtime::Runtime`] operations.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A configuration value failed validation at construction time.
    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),

    /// `deploy` was called with a name that's already registered.
    #[error("a component named '{0}' is already deployed")]
    DuplicateComponent(String),

    /// `undeploy` (or an internal lookup) referenced an unknown component.
    #[error("no component named '{0}' is deployed")]
    ComponentNotFound(String),

    /// An operation that requires `started` state was called before
    /// `start` completed.
    #[error("runtime has not been started")]
    NotStarted,

    /// `stop`/`undeploy` was called while the runtime is already
    /// stopping or has stopped.
    #[error("runtime is shutting down")]
    ShuttingDown,

    /// `stop` did not observe every component finish within its deadline.
    #[error("runtime shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),

    /// A reactor-level error surfaced while deploying or stopping a
    /// component.
    #[error(transparent)]
    Reactor(#[from] ReactorError),

    /// A bus-level error surfaced while publishing readiness or routing a
    /// lifecycle notification.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl RuntimeError {
    /// Whether retrying the same operation later might succeed (i.e. this
    /// isn't a structural/config problem).
    pub fn is_transient(&self) -> bool {
        matches!(self, RuntimeError::Reactor(ReactorError::Backpressure))
    }

    /// Whether the runtime is unusable after this error and must be
    /// rebuilt rather than retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RuntimeError::ShuttingDown | RuntimeError::ShutdownTimeout(_))
    }
}
