// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors returned by [`crate::bus::EventBus`] operations.
#[derive(Debug, Error)]
pub enum BusError {
    /// `send`/`request` found no subscriber registered for the address.
    #[error("no subscribers registered for address '{0}'")]
    NoSubscribers(String),

    /// The target reactor's mailbox is full.
    #[error("target reactor is at capacity")]
    Backpressure,

    /// `request` exceeded its deadline without a matching reply.
    #[error("request to '{address}' timed out after {timeout_ms}ms")]
    Timeout {
        /// The address that was called.
        address: String,
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// `request` observed external cancellation before a reply arrived.
    #[error("request to '{0}' was cancelled")]
    Cancelled(String),

    /// The ephemeral reply mailbox was closed before a reply arrived
    /// (should only happen if the bus itself is shutting down).
    #[error("reply channel for '{0}' closed before a reply arrived")]
    Closed(String),
}
