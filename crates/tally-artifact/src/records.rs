//! Stage artifact record types

use serde::{Deserialize, Serialize};
use tally_domain::{
    Claim, Conflict, DiscardedClaim, ReviewStats, Statistics, VerificationStats,
};

/// Raw claims delivered by the extraction layer
///
/// Self-describing and document-scoped; the only input the pipeline needs
/// besides the page-image manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawClaimsArtifact {
    /// Document the claims belong to
    pub document_id: String,

    /// The raw claim list (the extraction layer may name it `claims`)
    #[serde(alias = "claims")]
    pub extractions: Vec<Claim>,
}

/// Minimal view of any stage artifact: document id plus claim list
///
/// Later stages use this to read whichever artifact they are pointed at,
/// ignoring the producing stage's counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSetArtifact {
    /// Document the claims belong to
    pub document_id: String,

    /// Claims carried by the artifact
    #[serde(alias = "claims")]
    pub extractions: Vec<Claim>,
}

/// Output of the deduplication stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedArtifact {
    /// Document the claims belong to
    pub document_id: String,

    /// Claim count before deduplication
    pub total_raw_extractions: usize,

    /// Claim count after deduplication
    pub total_unique_extractions: usize,

    /// The deduplicated claim set
    pub extractions: Vec<Claim>,

    /// Divergent-value groups found while merging
    pub conflicts: Vec<Conflict>,

    /// Summary statistics over the deduplicated set
    pub statistics: Statistics,
}

/// Output of the validity filter stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredArtifact {
    /// Document the claims belong to
    pub document_id: String,

    /// Claim count entering the filter
    pub total_before_filtering: usize,

    /// Claim count surviving the filter
    pub total_after_filtering: usize,

    /// Claims removed by the filter
    pub total_discarded: usize,

    /// Discarded share of the input, rounded to 3 decimals
    pub discard_rate: f64,

    /// The surviving claim set, unmodified
    pub extractions: Vec<Claim>,

    /// Audit records for every removed claim
    pub discarded: Vec<DiscardedClaim>,

    /// Summary statistics over the surviving set
    pub statistics: Statistics,
}

/// Output of the self-verification stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedArtifact {
    /// Document the claims belong to
    pub document_id: String,

    /// Claim count (verification never adds or removes claims)
    pub total_extractions: usize,

    /// Confirmed / corrected / flagged / failed-page counts
    pub verification_stats: VerificationStats,

    /// The full claim set with verification statuses applied
    pub extractions: Vec<Claim>,
}

/// Output of the escalation review stage - the pipeline's final artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedArtifact {
    /// Document the claims belong to
    pub document_id: String,

    /// Claim count (review never adds or removes claims)
    pub total_extractions: usize,

    /// Reviewed / confirmed / corrected / ambiguous / failed counts
    pub review_stats: ReviewStats,

    /// The final claim set with review tiers applied
    pub extractions: Vec<Claim>,
}
