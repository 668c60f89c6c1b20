// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::error::ReactorError;

/// Default capacity for a reactor's job mailbox when a component doesn't
/// specify one.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1_000;

/// Construction-time configuration for a single [`crate::reactor::Reactor`].
///
/// # Example
/// ```rust
/// use reactant_rt::reactor::ReactorConfig;
///
/// let config = ReactorConfig::builder().with_mailbox_capacity(16).build().unwrap();
/// assert_eq!(config.mailbox_capacity(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactorConfig {
    mailbox_capacity: usize,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

impl ReactorConfig {
    /// Start a fluent builder seeded with defaults.
    pub fn builder() -> ReactorConfigBuilder {
        ReactorConfigBuilder::default()
    }

    /// The configured mailbox capacity.
    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity
    }

    fn validate(&self) -> Result<(), ReactorError> {
        if self.mailbox_capacity == 0 {
            return Err(ReactorError::InvalidConfig(
                "mailbox_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent, fail-fast builder for [`ReactorConfig`].
#[derive(Debug, Default)]
pub struct ReactorConfigBuilder {
    config: ReactorConfig,
}

impl ReactorConfigBuilder {
    /// Set the bounded job mailbox capacity.
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.config.mailbox_capacity = capacity;
        self
    }

    /// Validate and produce the final config.
    pub fn build(self) -> Result<ReactorConfig, ReactorError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ReactorConfig::builder().build().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = ReactorConfig::builder().with_mailbox_capacity(0).build();
        assert!(matches!(result, Err(ReactorError::InvalidConfig(_))));
    }

    #[test]
    fn builder_overrides_default() {
        let config = ReactorConfig::builder().with_mailbox_capacity(5).build().unwrap();
        assert_eq!(config.mailbox_capacity(), 5);
    }
}
