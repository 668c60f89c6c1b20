// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors produced by a [`crate::mailbox::Mailbox`].
///
/// This is the one error kind shared verbatim across every subsystem that
/// sits on top of a mailbox (reactor, bus, HTTP) — callers map it into their
/// own richer error type rather than matching on it directly at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// The mailbox is at capacity; the item was not enqueued.
    #[error("mailbox is full (capacity reached)")]
    Backpressure,

    /// The mailbox has been closed; no further items can be sent, and the
    /// receiver has drained everything that was buffered before closing.
    #[error("mailbox is closed")]
    Closed,
}
