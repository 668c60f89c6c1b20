//! A bounded, single-consumer FIFO channel: the one `Mailbox[T]` primitive
//! used throughout the crate (reactor job queue, HTTP request queue,
//! ephemeral bus reply mailbox).

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;

// Layer 3: Internal module imports
use super::error::MailboxError;

/// The sending half of a [`Mailbox`]. Cheap to clone; many senders may share
/// one receiver.
#[derive(Clone)]
pub struct MailboxSender<T> {
    inner: mpsc::Sender<T>,
}

impl<T> MailboxSender<T> {
    /// Non-blocking send. Returns `Backpressure` if the mailbox is full,
    /// `Closed` if the receiver has been dropped or closed.
    ///
    /// This is the only send path used by the reactor, the bus, and the
    /// HTTP admission path — none of them may block the caller's thread.
    pub fn try_send(&self, value: T) -> Result<(), MailboxError> {
        self.inner.try_send(value).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => MailboxError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => MailboxError::Closed,
        })
    }

    /// Suspending send: waits for capacity rather than failing fast. Used
    /// only by callers that have explicitly opted into blocking semantics
    /// (e.g. a `WorkerPool` job that chooses to wait rather than shed load).
    pub async fn send(&self, value: T) -> Result<(), MailboxError> {
        self.inner.send(value).await.map_err(|_| MailboxError::Closed)
    }

    /// Mailbox capacity this sender was created with.
    pub fn capacity(&self) -> usize {
        self.inner.max_capacity()
    }

    /// Number of free slots remaining at the moment of the call.
    pub fn available(&self) -> usize {
        self.inner.capacity()
    }
}

impl<T> fmt::Debug for MailboxSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailboxSender")
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// The receiving half of a [`Mailbox`]. Not clonable: a mailbox has exactly
/// one consumer.
pub struct MailboxReceiver<T> {
    inner: mpsc::Receiver<T>,
}

impl<T> MailboxReceiver<T> {
    /// Suspend until an item is available or the mailbox is closed and
    /// drained, in which case `None` is returned.
    pub async fn recv(&mut self) -> Option<T> {
        self.inner.recv().await
    }

    /// Non-blocking receive.
    pub fn try_recv(&mut self) -> Result<T, MailboxError> {
        self.inner.try_recv().map_err(|err| match err {
            mpsc::error::TryRecvError::Empty => MailboxError::Backpressure,
            mpsc::error::TryRecvError::Disconnected => MailboxError::Closed,
        })
    }

    /// Close the mailbox: no further `send`/`try_send` will succeed once the
    /// channel buffer empties, but anything already buffered still drains
    /// through `recv`/`try_recv` first.
    pub fn close(&mut self) {
        self.inner.close();
    }

    /// Approximate number of items currently buffered.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the mailbox currently has no buffered items.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Create a bounded mailbox of capacity `capacity`.
///
/// # Panics
/// Panics if `capacity` is zero, mirroring `tokio::sync::mpsc::channel`.
pub fn channel<T>(capacity: usize) -> (MailboxSender<T>, MailboxReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity);
    (MailboxSender { inner: tx }, MailboxReceiver { inner: rx })
}
