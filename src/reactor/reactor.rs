//! The single-consumer executor at the heart of the crate: one bounded
//! mailbox of jobs, drained strictly in FIFO order, one job in flight at a
//! time, with panic isolation so a bad job can't kill the component.

// Layer 1: Standard library imports
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use futures::FutureExt;
use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

// Layer 3: Internal module imports
use super::config::ReactorConfig;
use super::error::ReactorError;
use crate::mailbox::{self, MailboxReceiver, MailboxSender};

/// A unit of work submitted to a reactor: a boxed, owned future.
///
/// Message delivery, component lifecycle hooks, and request/reply
/// completions are all naturally `async fn`s, so jobs are futures rather
/// than plain synchronous closures — this avoids forcing every caller to
/// spin up a nested executor just to await something. The reactor still
/// awaits exactly one job to completion before starting the next.
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Lifecycle state of a [`Reactor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorState {
    /// Created but not yet draining its mailbox.
    Idle,
    /// Draining its mailbox and executing jobs.
    Running,
    /// Mailbox closed; no further submissions accepted.
    Stopped,
}

struct Inner {
    name: String,
    sender: MailboxSender<Job>,
    receiver: AsyncMutex<Option<MailboxReceiver<Job>>>,
    state: RwLock<ReactorState>,
    join_handle: AsyncMutex<Option<JoinHandle<()>>>,
}

/// Owns one bounded mailbox of jobs and one serial execution context.
///
/// Cheap to clone: every clone is a handle to the same underlying executor,
/// mirroring how a registry or event bus hands reactor handles around
/// without taking ownership of them.
#[derive(Clone)]
pub struct Reactor {
    inner: Arc<Inner>,
}

impl Reactor {
    /// Create a new, `Idle` reactor. Call [`Reactor::start`] to begin
    /// draining its mailbox.
    pub fn new(name: impl Into<String>, config: ReactorConfig) -> Self {
        let (sender, receiver) = mailbox::channel(config.mailbox_capacity());
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                sender,
                receiver: AsyncMutex::new(Some(receiver)),
                state: RwLock::new(ReactorState::Idle),
                join_handle: AsyncMutex::new(None),
            }),
        }
    }

    /// The component name this reactor was created for.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReactorState {
        *self.inner.state.read()
    }

    /// Non-blocking submission. Fails fast with `Backpressure` if the
    /// mailbox is full, or `Stopped` if the reactor has already been
    /// stopped.
    pub fn submit<F>(&self, job: F) -> Result<(), ReactorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if *self.inner.state.read() == ReactorState::Stopped {
            return Err(ReactorError::Stopped);
        }
        self.inner.sender.try_send(Box::pin(job))?;
        Ok(())
    }

    /// Idempotent: spawns the serial drain loop the first time it's called.
    /// Subsequent calls on an already-`Running`/`Stopped` reactor are no-ops.
    pub async fn start(&self) {
        let mut receiver_slot = self.inner.receiver.lock().await;
        let Some(receiver) = receiver_slot.take() else {
            return;
        };

        {
            let mut state = self.inner.state.write();
            if *state != ReactorState::Idle {
                *receiver_slot = Some(receiver);
                return;
            }
            *state = ReactorState::Running;
        }

        let name = self.inner.name.clone();
        let handle = tokio::spawn(drain_loop(name, receiver));
        *self.inner.join_handle.lock().await = Some(handle);
    }

    /// Close the mailbox (rejecting new submissions) and await the
    /// executor finishing any jobs already buffered, bounded by `timeout`.
    pub async fn stop(&self, timeout: Duration) -> Result<(), ReactorError> {
        *self.inner.state.write() = ReactorState::Stopped;

        let handle = self.inner.join_handle.lock().await.take();
        let Some(handle) = handle else {
            // Never started: nothing to drain.
            return Ok(());
        };

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(join_err)) => {
                error!(reactor = %self.inner.name, error = %join_err, "reactor drain task panicked");
                Ok(())
            }
            Err(_) => Err(ReactorError::ShutdownTimeout),
        }
    }
}

async fn drain_loop(name: String, mut receiver: MailboxReceiver<Job>) {
    receiver.close();
    let mut sequence: u64 = 0;
    while let Some(job) = receiver.recv().await {
        trace!(reactor = %name, sequence, "executing job");
        let outcome = AssertUnwindSafe(job).catch_unwind().await;
        if let Err(panic) = outcome {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(reactor = %name, sequence, panic = %message, "job panicked; recovered");
        } else {
            debug!(reactor = %name, sequence, "job completed");
        }
        sequence += 1;
    }
    debug!(reactor = %name, "drain loop exiting: mailbox closed and empty");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Notify;

    fn config(capacity: usize) -> ReactorConfig {
        ReactorConfig::builder().with_mailbox_capacity(capacity).build().unwrap()
    }

    #[tokio::test]
    async fn s1_reactor_fifo_order() {
        let reactor = Reactor::new("s1", config(8));
        reactor.start().await;

        let list = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for i in 1..=3u32 {
            let list = list.clone();
            reactor.submit(async move { list.lock().push(i) }).unwrap();
        }

        reactor.stop(Duration::from_secs(1)).await.unwrap();
        assert_eq!(*list.lock(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn s2_reactor_backpressure_then_recovery() {
        let reactor = Reactor::new("s2", config(1));
        reactor.start().await;

        let latch = Arc::new(Notify::new());
        let latch_wait = latch.clone();
        reactor.submit(async move { latch_wait.notified().await }).unwrap();

        // mailbox is now occupied by the blocking job; second submission
        // must be rejected without blocking.
        let second = reactor.submit(async {});
        assert!(matches!(second, Err(ReactorError::Backpressure)));

        latch.notify_one();
        // give the drain loop a beat to pick the next submission slot free.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(reactor.submit(async {}).is_ok());

        reactor.stop(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn submit_after_stop_is_rejected() {
        let reactor = Reactor::new("stopped", config(4));
        reactor.start().await;
        reactor.stop(Duration::from_secs(1)).await.unwrap();
        assert!(matches!(reactor.submit(async {}), Err(ReactorError::Stopped)));
    }

    #[tokio::test]
    async fn panicking_job_does_not_stop_the_reactor() {
        let reactor = Reactor::new("panicky", config(8));
        reactor.start().await;

        reactor.submit(async { panic!("boom") }).unwrap();

        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        reactor
            .submit(async move {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        reactor.stop(Duration::from_secs(1)).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let reactor = Reactor::new("idempotent", config(4));
        reactor.start().await;
        reactor.start().await;
        assert_eq!(reactor.state(), ReactorState::Running);
        reactor.stop(Duration::from_secs(1)).await.unwrap();
    }

    #[tokio::test]
    async fn stop_without_start_is_a_clean_noop() {
        let reactor = Reactor::new("never-started", config(4));
        assert!(reactor.stop(Duration::from_secs(1)).await.is_ok());
        assert_eq!(reactor.state(), ReactorState::Stopped);
    }

    proptest::proptest! {
        // Invariant 1: whatever order closures are submitted in, they run
        // in that same order.
        #[test]
        fn fifo_order_holds_for_arbitrary_submission_sequences(
            sequence in proptest::collection::vec(0u32..1000, 1..64)
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let observed = rt.block_on(async {
                let reactor = Reactor::new("proptest-fifo", config(sequence.len().max(1)));
                reactor.start().await;
                let observed = Arc::new(parking_lot::Mutex::new(Vec::new()));
                for value in &sequence {
                    let observed = observed.clone();
                    let value = *value;
                    reactor.submit(async move { observed.lock().push(value) }).unwrap();
                }
                reactor.stop(Duration::from_secs(2)).await.unwrap();
                observed.lock().clone()
            });
            assert_eq!(observed, sequence);
        }
    }
}
