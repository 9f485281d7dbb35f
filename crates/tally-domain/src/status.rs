//! Verification status and review tier - the claim state machines

use serde::{Deserialize, Serialize};

/// Outcome of the self-verification stage for a claim
///
/// Claims start `UNVERIFIED`. After a successful verification pass every
/// claim on the page ends in one of the other three states; oracle silence
/// about a submitted claim counts as confirmation, never as rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Not yet seen by the verification oracle
    Unverified,

    /// Oracle agreed with the extracted value
    Confirmed,

    /// Oracle replaced the value with its own reading
    Corrected,

    /// Oracle could not decide; needs escalation
    Flagged,
}

impl VerificationStatus {
    /// Get the status name as it appears in artifacts
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "UNVERIFIED",
            VerificationStatus::Confirmed => "CONFIRMED",
            VerificationStatus::Corrected => "CORRECTED",
            VerificationStatus::Flagged => "FLAGGED",
        }
    }
}

impl Default for VerificationStatus {
    fn default() -> Self {
        VerificationStatus::Unverified
    }
}

/// Deepest review a claim has reached
///
/// Progression is strictly `none` → `automatic` → `manual`; `manual` is a
/// terminal state that hands the claim to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTier {
    /// Never escalated
    None,

    /// Adjudicated by the review oracle
    Automatic,

    /// The review oracle punted; a human must decide
    Manual,
}

impl ReviewTier {
    /// Get the tier name as it appears in artifacts
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewTier::None => "none",
            ReviewTier::Automatic => "automatic",
            ReviewTier::Manual => "manual",
        }
    }
}

impl Default for ReviewTier {
    fn default() -> Self {
        ReviewTier::None
    }
}
