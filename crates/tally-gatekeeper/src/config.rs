//! Configuration for the validity filter

use serde::{Deserialize, Serialize};

/// Configuration for the validity filter rule chain
///
/// The defaults encode the KPI domain's noise profile; deployments can
/// override any table via TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum accepted KPI name length
    pub min_name_len: usize,

    /// Maximum accepted KPI name length
    pub max_name_len: usize,

    /// Names starting with one of these structural tokens are noise
    pub blacklist_prefixes: Vec<String>,

    /// Names containing one of these boilerplate phrases are noise
    pub blacklist_substrings: Vec<String>,

    /// Accepted units; a unit passes on exact or substring match
    pub valid_units: Vec<String>,

    /// Claims below this confidence are rejected
    pub min_confidence: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_name_len: 3,
            max_name_len: 50,
            blacklist_prefixes: [
                "table", "schedule", "note", "annexure", "figure", "chart", "graph", "page",
                "section", "appendix", "exhibit",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            blacklist_substrings: [
                "as per",
                "in accordance",
                "refer to",
                "...",
                "---",
                "***",
                "___",
                "total assets",
                "total liabilities",
                "revenue",
                "profit",
                "loss",
                "balance sheet",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            valid_units: [
                // Counts
                "employees",
                "count",
                "number",
                "units",
                "branches",
                "stores",
                "customers",
                "subscribers",
                "users",
                "accounts",
                // Currency magnitudes
                "inr",
                "usd",
                "eur",
                "gbp",
                "crores",
                "millions",
                "lakhs",
                "billions",
                "thousands",
                // Percentages
                "percentage",
                "%",
                "percent",
                // Rates
                "per month",
                "per annum",
                "per day",
                "arpu",
                // Physical volumes
                "tons",
                "kg",
                "kilograms",
                "liters",
                "mw",
                "kw",
                "sq.ft.",
                "acres",
                "hectares",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_confidence: 0.50,
        }
    }
}

impl FilterConfig {
    /// Permissive preset: no confidence floor, for exploratory runs
    pub fn permissive() -> Self {
        Self {
            min_confidence: 0.0,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_name_len > self.max_name_len {
            return Err("min_name_len cannot exceed max_name_len".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("min_confidence must be in [0.0, 1.0]".to_string());
        }
        if self.valid_units.is_empty() {
            return Err("valid_units must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
