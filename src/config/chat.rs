//! Chat feed configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Chat feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Buffer size for each feed room's broadcast channel. Larger
    /// values tolerate slower subscribers at the cost of memory.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

impl ChatConfig {
    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.feed_capacity == 0 {
            return Err(ValidationError::InvalidFeedCapacity);
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            feed_capacity: default_feed_capacity(),
        }
    }
}

fn default_feed_capacity() -> usize {
    128
}
