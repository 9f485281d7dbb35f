//! The validity filter rule chain

use crate::config::FilterConfig;
use tally_domain::{Claim, DiscardedClaim};
use tracing::{debug, info};

/// Why a claim was discarded
///
/// The chain is ordered and the first failing predicate wins, so every
/// discard carries exactly one reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    /// Name longer than the configured maximum
    NameTooLong,

    /// Name shorter than the configured minimum
    NameTooShort,

    /// Name starts with a structural/noise token
    BlacklistPrefix(String),

    /// Name contains a boilerplate phrase or excluded line item
    BlacklistContains,

    /// Name is purely digits and punctuation
    JustANumber,

    /// No numeric value in a category that requires one
    NoNumericValue,

    /// Unit not in the accepted whitelist
    InvalidUnit,

    /// Confidence below the configured floor
    LowConfidence,
}

impl DiscardReason {
    /// Stable reason code for artifacts and logs
    pub fn code(&self) -> String {
        match self {
            DiscardReason::NameTooLong => "name_too_long".to_string(),
            DiscardReason::NameTooShort => "name_too_short".to_string(),
            DiscardReason::BlacklistPrefix(token) => format!("blacklist_prefix_{}", token),
            DiscardReason::BlacklistContains => "blacklist_contains".to_string(),
            DiscardReason::JustANumber => "just_a_number".to_string(),
            DiscardReason::NoNumericValue => "no_numeric_value".to_string(),
            DiscardReason::InvalidUnit => "invalid_unit".to_string(),
            DiscardReason::LowConfidence => "low_confidence".to_string(),
        }
    }
}

/// Result of a filter pass
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Claims that passed all checks, unmodified
    pub retained: Vec<Claim>,

    /// Audit records for the removed claims, in input order
    pub discarded: Vec<DiscardedClaim>,
}

/// The Gatekeeper validates claims against the configured rule chain
pub struct Gatekeeper {
    config: FilterConfig,
}

impl Gatekeeper {
    /// Create a Gatekeeper with the given configuration
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Run every claim through the rule chain
    ///
    /// Survivors pass through byte-identical, so re-filtering a filtered
    /// set discards nothing further.
    pub fn filter(&self, claims: Vec<Claim>) -> FilterOutcome {
        let total = claims.len();
        let mut retained = Vec::with_capacity(total);
        let mut discarded = Vec::new();

        for claim in claims {
            match self.evaluate(&claim) {
                None => retained.push(claim),
                Some(reason) => {
                    debug!(kpi = %claim.kpi_name, reason = %reason.code(), "discarding claim");
                    discarded.push(DiscardedClaim {
                        id: claim.id,
                        kpi_name: claim.kpi_name,
                        reason: reason.code(),
                    });
                }
            }
        }

        info!(
            total,
            retained = retained.len(),
            discarded = discarded.len(),
            "validity filter complete"
        );

        FilterOutcome {
            retained,
            discarded,
        }
    }

    /// Apply the ordered rule chain; `None` means the claim is valid
    fn evaluate(&self, claim: &Claim) -> Option<DiscardReason> {
        let name = claim.kpi_name.as_str();

        // 1. Name length
        if name.chars().count() > self.config.max_name_len {
            return Some(DiscardReason::NameTooLong);
        }
        if name.chars().count() < self.config.min_name_len {
            return Some(DiscardReason::NameTooShort);
        }

        let name_lower = name.to_lowercase();

        // 2. Blacklisted prefixes
        for prefix in &self.config.blacklist_prefixes {
            if name_lower.starts_with(prefix.as_str()) {
                return Some(DiscardReason::BlacklistPrefix(prefix.clone()));
            }
        }

        // 3. Blacklisted substrings
        if self
            .config
            .blacklist_substrings
            .iter()
            .any(|phrase| name_lower.contains(phrase.as_str()))
        {
            return Some(DiscardReason::BlacklistContains);
        }

        // 4. Purely numeric names
        if name.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return Some(DiscardReason::JustANumber);
        }

        // 5. Missing numeric value, unless the category is qualitative-exempt
        if claim.value_numeric.is_none() && !claim.category.allows_qualitative() {
            return Some(DiscardReason::NoNumericValue);
        }

        // 6. Unit whitelist
        if !self.is_valid_unit(&claim.unit) {
            return Some(DiscardReason::InvalidUnit);
        }

        // 7. Confidence floor
        if claim.confidence < self.config.min_confidence {
            return Some(DiscardReason::LowConfidence);
        }

        None
    }

    /// A unit passes on exact or substring match against the whitelist
    fn is_valid_unit(&self, unit: &str) -> bool {
        let unit_lower = unit.trim().to_lowercase();
        if unit_lower.is_empty() {
            return false;
        }

        self.config
            .valid_units
            .iter()
            .any(|valid| unit_lower == *valid || unit_lower.contains(valid.as_str()))
    }
}
