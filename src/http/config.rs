// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::runtime::RuntimeError;
use crate::util::duration_serde;

const WORKER_FLOOR: usize = 50;
const QUEUE_FLOOR: usize = 100;
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CCU: usize = 10_000;
const DEFAULT_UTILIZATION_PERCENT: u8 = 80;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Construction-time configuration for the HTTP intake path.
///
/// `normal_capacity = floor(max_ccu * utilization_percent / 100)`, and
/// `workers + queue_capacity` is derived from it unless explicitly
/// overridden, subject to the floors `workers >= 50` and
/// `queue_capacity >= 100`.
///
/// # Example
/// ```rust
/// use reactant_rt::http::HttpConfig;
///
/// let config = HttpConfig::builder()
///     .with_max_ccu(10)
///     .with_utilization_percent(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.normal_capacity(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    listen_addr: String,
    max_ccu: usize,
    utilization_percent: u8,
    workers: Option<usize>,
    queue_capacity: Option<usize>,
    #[serde(with = "duration_serde")]
    read_timeout: Duration,
    #[serde(with = "duration_serde")]
    write_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_ccu: DEFAULT_MAX_CCU,
            utilization_percent: DEFAULT_UTILIZATION_PERCENT,
            workers: None,
            queue_capacity: None,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpConfig {
    /// Start a fluent builder seeded with defaults.
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }

    /// The address the server binds to.
    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Configured maximum concurrent-connection ceiling.
    pub fn max_ccu(&self) -> usize {
        self.max_ccu
    }

    /// `floor(max_ccu * utilization_percent / 100)`.
    pub fn normal_capacity(&self) -> usize {
        (self.max_ccu * self.utilization_percent as usize) / 100
    }

    /// Resolved worker count: explicit override, else derived from
    /// `normal_capacity`, floored at [`WORKER_FLOOR`].
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| self.normal_capacity().max(WORKER_FLOOR))
    }

    /// Resolved admission-queue capacity: explicit override, else the
    /// remainder of `normal_capacity` after `workers`, floored at
    /// [`QUEUE_FLOOR`].
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or_else(|| {
            let derived = self.normal_capacity().saturating_sub(self.workers());
            derived.max(QUEUE_FLOOR)
        })
    }

    /// Per-connection read timeout.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Per-connection write timeout.
    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    fn validate(&self) -> Result<(), RuntimeError> {
        if self.max_ccu == 0 {
            return Err(RuntimeError::InvalidConfig("max_ccu must be greater than zero".into()));
        }
        if self.utilization_percent == 0 || self.utilization_percent > 100 {
            return Err(RuntimeError::InvalidConfig(
                "utilization_percent must be in 1..=100".into(),
            ));
        }
        if let Some(workers) = self.workers {
            if workers < WORKER_FLOOR {
                return Err(RuntimeError::InvalidConfig(format!(
                    "workers must be at least {WORKER_FLOOR}"
                )));
            }
        }
        if let Some(queue_capacity) = self.queue_capacity {
            if queue_capacity < QUEUE_FLOOR {
                return Err(RuntimeError::InvalidConfig(format!(
                    "queue_capacity must be at least {QUEUE_FLOOR}"
                )));
            }
        }
        if self.read_timeout.is_zero() || self.write_timeout.is_zero() {
            return Err(RuntimeError::InvalidConfig(
                "read_timeout and write_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent, fail-fast builder for [`HttpConfig`].
#[derive(Debug, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    /// Set the listen address.
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum concurrent-connection ceiling.
    pub fn with_max_ccu(mut self, max_ccu: usize) -> Self {
        self.config.max_ccu = max_ccu;
        self
    }

    /// Set the utilization percentage used to derive `normal_capacity`.
    pub fn with_utilization_percent(mut self, percent: u8) -> Self {
        self.config.utilization_percent = percent;
        self
    }

    /// Override the derived worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = Some(workers);
        self
    }

    /// Override the derived admission-queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    /// Set the per-connection read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the per-connection write timeout.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    /// Validate and produce the final config.
    pub fn build(self) -> Result<HttpConfig, RuntimeError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
