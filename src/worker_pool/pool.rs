//! Fixed-size pool of workers draining one bounded job queue — the offload
//! path for blocking or CPU-heavy work that would otherwise stall a reactor.

// Layer 1: Standard library imports
use std::future::Future;
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
use crate::mailbox::{self, MailboxError, MailboxReceiver, MailboxSender};

/// A unit of work submitted to a [`WorkerPool`].
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolState {
    Idle,
    Running,
    Stopped,
}

struct Inner {
    sender: MailboxSender<Job>,
    receiver: Arc<AsyncMutex<MailboxReceiver<Job>>>,
    state: RwLock<PoolState>,
    worker_count: usize,
    handles: RwLock<Vec<JoinHandle<()>>>,
}

/// A fixed number of workers competing for jobs off one bounded queue.
///
/// Unlike a [`crate::reactor::Reactor`], which guarantees strict serial
/// execution for one component, a `WorkerPool` is a shared, unordered work
/// queue: many workers drain it concurrently, each recovering independently
/// from a panicking job.
///
/// # Example
/// ```rust
/// use reactant_rt::worker_pool::WorkerPool;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let pool = WorkerPool::new(4, 100);
/// pool.start();
/// pool.submit(async { /* blocking work */ }).unwrap();
/// pool.stop(Duration::from_secs(1)).await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<Inner>,
}

impl WorkerPool {
    /// Create a pool with `worker_count` workers draining a queue of
    /// `queue_capacity`. Call [`WorkerPool::start`] to spawn the workers.
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        let (sender, receiver) = mailbox::channel(queue_capacity);
        Self {
            inner: Arc::new(Inner {
                sender,
                receiver: Arc::new(AsyncMutex::new(receiver)),
                state: RwLock::new(PoolState::Idle),
                worker_count,
                handles: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Non-blocking submission. Fails fast with `Backpressure` if the queue
    /// is full, `Closed` if the pool has been stopped.
    pub fn submit<F>(&self, job: F) -> Result<(), MailboxError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if *self.inner.state.read() == PoolState::Stopped {
            return Err(MailboxError::Closed);
        }
        self.inner.sender.try_send(Box::pin(job))
    }

    /// Idempotent: spawns `worker_count` worker tasks the first time it's
    /// called.
    pub fn start(&self) {
        {
            let mut state = self.inner.state.write();
            if *state != PoolState::Idle {
                return;
            }
            *state = PoolState::Running;
        }

        let mut handles = self.inner.handles.write();
        for id in 0..self.inner.worker_count {
            handles.push(tokio::spawn(worker_loop(id, self.inner.receiver.clone())));
        }
    }

    /// Close the job queue and await every worker draining its remaining
    /// buffered jobs, bounded by `timeout`.
    pub async fn stop(&self, timeout: Duration) -> Result<(), MailboxError> {
        *self.inner.state.write() = PoolState::Stopped;
        self.inner.receiver.lock().await.close();

        let handles: Vec<_> = self.inner.handles.write().drain(..).collect();
        let joined = tokio::time::timeout(timeout, futures::future::join_all(handles)).await;
        match joined {
            Ok(_) => Ok(()),
            Err(_) => Err(MailboxError::Backpressure),
        }
    }
}

async fn worker_loop(id: usize, receiver: Arc<AsyncMutex<MailboxReceiver<Job>>>) {
    loop {
        let job = {
            let mut guard = receiver.lock().await;
            guard.recv().await
        };
        let Some(job) = job else {
            debug!(worker = id, "worker exiting: queue closed and drained");
            return;
        };
        trace!(worker = id, "executing job");
        if let Err(panic) = std::panic::AssertUnwindSafe(job).catch_unwind().await {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(worker = id, panic = %message, "job panicked; recovered");
        }
    }
}
