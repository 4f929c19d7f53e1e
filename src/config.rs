use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of runs the staging buffer holds before it is consolidated.
pub const DEFAULT_STAGING_CAPACITY: usize = 1024;

/// Tuning knobs for [`RunLengthCompression`](crate::RunLengthCompression).
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partial JSON object such as `{}` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of distinct runs buffered between consolidations.
    pub staging_capacity: usize,
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the staging buffer capacity (in runs).
    pub fn with_staging_capacity(mut self, staging_capacity: usize) -> Self {
        self.staging_capacity = staging_capacity;
        self
    }

    /// Checks that the configuration can back an engine.
    pub fn validate(&self) -> Result<()> {
        if self.staging_capacity == 0 {
            return Err(Error::InvalidConfig(
                "staging_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staging_capacity: DEFAULT_STAGING_CAPACITY,
        }
    }
}
