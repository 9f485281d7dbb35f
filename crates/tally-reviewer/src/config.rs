//! Configuration for the escalation reviewer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the escalation review stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewerConfig {
    /// Claims below this confidence are escalated even if not flagged
    pub confidence_threshold: f64,

    /// Maximum time for a single review call (seconds)
    pub call_timeout_secs: u64,

    /// Minimum interval between review calls (milliseconds)
    ///
    /// The review oracle is the scarcer resource, so the default is more
    /// conservative than the verifier's.
    pub min_call_interval_ms: u64,
}

impl ReviewerConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the rate-limit interval as a Duration
    pub fn min_call_interval(&self) -> Duration {
        Duration::from_millis(self.min_call_interval_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err("confidence_threshold must be in [0.0, 1.0]".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.70,
            call_timeout_secs: 120,
            min_call_interval_ms: 2000,
        }
    }
}
