//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_gatekeeper::FilterConfig;
use tally_oracle::GeminiOracle;
use tally_reviewer::ReviewerConfig;
use tally_verifier::VerifierConfig;

/// CLI configuration, read from TOML.
///
/// Every section is optional; omitted sections fall back to stage defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hosted oracle connection settings
    pub oracle: OracleSettings,

    /// Validity filter tables and thresholds
    pub filter: FilterConfig,

    /// Self-verifier timeouts and rate limit
    pub verifier: VerifierConfig,

    /// Escalation reviewer threshold, timeouts and rate limit
    pub reviewer: ReviewerConfig,
}

/// Connection settings for the hosted vision oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// API base URL
    pub endpoint: String,

    /// Vision model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Attempts per oracle call
    pub max_retries: u32,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: tally_oracle::DEFAULT_ENDPOINT.to_string(),
            model: tally_oracle::DEFAULT_MODEL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            max_retries: 3,
        }
    }
}

impl OracleSettings {
    /// Build an oracle client, reading the API key from the environment.
    pub fn build(&self) -> Result<GeminiOracle> {
        let api_key = std::env::var(&self.api_key_env).map_err(|_| {
            CliError::Config(format!(
                "API key not found: set the {} environment variable",
                self.api_key_env
            ))
        })?;

        let oracle = GeminiOracle::new(&self.endpoint, &self.model, api_key)
            .map_err(|e| CliError::Config(e.to_string()))?
            .with_max_retries(self.max_retries);
        Ok(oracle)
    }
}

impl Config {
    /// Default configuration file location.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".tally").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicitly given path must exist; the default path is used only
    /// when present, otherwise stage defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.filter.validate().map_err(CliError::Config)?;
        self.verifier.validate().map_err(CliError::Config)?;
        self.reviewer.validate().map_err(CliError::Config)?;
        Ok(())
    }
}
