//! Request and response types for the oracle contracts

use serde::{Deserialize, Serialize};
use tally_domain::{Claim, ClaimId};

/// Simplified view of a claim sent to an oracle
///
/// Only what the oracle needs to locate the figure on the page; the full
/// claim never leaves the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDigest {
    /// Claim id, echoed back by the oracle to match corrections
    pub id: ClaimId,

    /// KPI label
    pub kpi_name: String,

    /// Fiscal year
    pub fiscal_year: i32,

    /// Numeric value as extracted, or null
    pub value: Option<f64>,

    /// Unit string
    pub unit: String,

    /// Current confidence
    pub confidence: f64,
}

impl From<&Claim> for ClaimDigest {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id,
            kpi_name: claim.kpi_name.clone(),
            fiscal_year: claim.fiscal_year,
            value: claim.value_numeric,
            unit: claim.unit.clone(),
            confidence: claim.confidence,
        }
    }
}

/// Per-claim judgment inside a page verification response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionStatus {
    /// The extracted value matches the page
    Confirmed,
    /// The oracle read a different value
    Corrected,
    /// The oracle could not decide
    Flagged,
}

/// One correction entry from the verification oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimCorrection {
    /// Id of the claim being judged
    #[serde(alias = "extraction_id")]
    pub id: ClaimId,

    /// Replacement value when status is CORRECTED
    #[serde(default)]
    pub corrected_value: Option<f64>,

    /// The oracle's judgment
    pub status: CorrectionStatus,

    /// How certain the oracle is of its judgment
    #[serde(default)]
    pub verification_confidence: Option<f64>,

    /// The oracle's stated rationale
    #[serde(default)]
    pub reasoning: String,
}

/// Verification oracle response for one page batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageVerification {
    /// Page the response refers to
    pub page: u32,

    /// Page-level summary status; informational only
    #[serde(default)]
    pub review_status: Option<String>,

    /// Per-claim judgments; claims not listed count as confirmed
    #[serde(default)]
    pub corrections: Vec<ClaimCorrection>,
}

/// Final adjudication decision from the review oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    /// The extraction is right as-is
    Correct,
    /// The extraction is wrong; a corrected value is supplied
    Incorrect,
    /// Cannot be determined from the page alone
    Ambiguous,
}

/// Review oracle response for a single claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    /// The adjudication
    #[serde(alias = "review_decision")]
    pub decision: ReviewDecision,

    /// Replacement value when the decision is INCORRECT
    #[serde(default)]
    pub corrected_value: Option<f64>,

    /// How certain the oracle is of its decision
    #[serde(default, alias = "gemini_confidence")]
    pub review_confidence: Option<f64>,

    /// The oracle's stated rationale
    #[serde(default)]
    pub reasoning: String,

    /// What extra context would resolve an AMBIGUOUS decision
    #[serde(default, alias = "additional_context_needed")]
    pub additional_context: Option<String>,
}
