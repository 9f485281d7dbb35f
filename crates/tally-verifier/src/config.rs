//! Configuration for the self-verifier

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the self-verification stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum time for a single page verification call (seconds)
    pub call_timeout_secs: u64,

    /// Minimum interval between oracle calls (milliseconds)
    pub min_call_interval_ms: u64,
}

impl VerifierConfig {
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

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 120,
            min_call_interval_ms: 1000,
        }
    }
}
