// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::mailbox::MailboxError;

/// Errors returned by [`crate::reactor::Reactor::submit`] and
/// [`crate::reactor::Reactor::stop`].
#[derive(Debug, Error)]
pub enum ReactorError {
    /// The reactor's job mailbox is full; the closure was not enqueued.
    #[error("reactor mailbox is at capacity")]
    Backpressure,

    /// The reactor has already been stopped and no longer accepts work.
    #[error("reactor has been stopped")]
    Stopped,

    /// `stop` did not observe the executor finish within the given
    /// deadline.
    #[error("reactor did not finish draining within the shutdown deadline")]
    ShutdownTimeout,

    /// The reactor configuration was invalid (e.g. zero mailbox capacity).
    #[error("invalid reactor configuration: {0}")]
    InvalidConfig(String),
}

impl From<MailboxError> for ReactorError {
    fn from(err: MailboxError) -> Self {
        match err {
            MailboxError::Backpressure => Self::Backpressure,
            MailboxError::Closed => Self::Stopped,
        }
    }
}
