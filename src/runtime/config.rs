// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::error::RuntimeError;
use crate::util::duration_serde;

const DEFAULT_MAILBOX_CAPACITY: usize = 1_000;
const DEFAULT_WORKER_COUNT: usize = 50;
const DEFAULT_WORKER_QUEUE_CAPACITY: usize = 1_000;
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Construction-time configuration for a [`crate::runtime::Runtime`].
///
/// # Example
/// ```rust
/// use reactant_rt::runtime::RuntimeConfig;
///
/// let config = RuntimeConfig::builder().with_worker_count(8).build().unwrap();
/// assert_eq!(config.worker_count(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    default_mailbox_capacity: usize,
    worker_count: usize,
    worker_queue_capacity: usize,
    #[serde(with = "duration_serde")]
    shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            worker_count: DEFAULT_WORKER_COUNT,
            worker_queue_capacity: DEFAULT_WORKER_QUEUE_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl RuntimeConfig {
    /// Start a fluent builder seeded with defaults.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Mailbox capacity newly deployed components get unless they request
    /// another.
    pub fn default_mailbox_capacity(&self) -> usize {
        self.default_mailbox_capacity
    }

    /// Fixed number of `WorkerPool` workers.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Bounded job queue capacity for the `WorkerPool`.
    pub fn worker_queue_capacity(&self) -> usize {
        self.worker_queue_capacity
    }

    /// Deadline `Runtime::stop` waits for components and the worker pool to
    /// drain before giving up.
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    fn validate(&self) -> Result<(), RuntimeError> {
        if self.default_mailbox_capacity == 0 {
            return Err(RuntimeError::InvalidConfig(
                "default_mailbox_capacity must be greater than zero".into(),
            ));
        }
        if self.worker_count == 0 {
            return Err(RuntimeError::InvalidConfig("worker_count must be greater than zero".into()));
        }
        if self.worker_queue_capacity == 0 {
            return Err(RuntimeError::InvalidConfig(
                "worker_queue_capacity must be greater than zero".into(),
            ));
        }
        if self.shutdown_timeout.is_zero() {
            return Err(RuntimeError::InvalidConfig("shutdown_timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Fluent, fail-fast builder for [`RuntimeConfig`].
#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    /// Set the default per-component mailbox capacity.
    pub fn with_default_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.config.default_mailbox_capacity = capacity;
        self
    }

    /// Set the fixed worker-pool worker count.
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Set the worker-pool job queue capacity.
    pub fn with_worker_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.worker_queue_capacity = capacity;
        self
    }

    /// Set the shutdown deadline.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Validate and produce the final config.
    pub fn build(self) -> Result<RuntimeConfig, RuntimeError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
