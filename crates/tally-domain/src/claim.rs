//! Claim module - the unit of reconciliation

use crate::category::KpiCategory;
use crate::status::{ReviewTier, VerificationStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a claim, based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability (ids created later sort later)
/// - 128-bit uniqueness with no coordination between extraction workers
/// - RFC 9562-standard format with broad ecosystem support
///
/// The id is assigned when the upstream extractor creates the claim and is
/// immutable afterwards; every stage uses it as the join key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(uuid::Uuid);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use tally_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert_ne!(id, ClaimId::new());
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a ClaimId from its canonical string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid claim id '{}': {}", s, e))
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provenance of a claim: where on the document it was read
///
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// 1-based page number within the source document
    pub page: u32,

    /// Section name the page belongs to, as reported by the extractor
    #[serde(default)]
    pub section: String,
}

/// Mutable status flags carried by a claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFlags {
    /// Set when any stage decides a human or a stronger oracle must look
    #[serde(default)]
    pub needs_review: bool,

    /// Set by the deduplicator when the claim won a divergent-value group
    #[serde(default)]
    pub conflicting_values: bool,
}

/// One assertion about a KPI value, as produced by the upstream extractor
///
/// Claims flow through the pipeline stages (deduplication, validity
/// filtering, self-verification, escalation review), each of which may
/// adjust value, confidence, status, and flags. A claim is only ever
/// removed by the validity filter, and then it leaves a discard record
/// behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier, stable through all stages
    pub id: ClaimId,

    /// Short KPI label, e.g. "Employee Count"
    pub kpi_name: String,

    /// Longer free-text description from the extractor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi_description: Option<String>,

    /// KPI category; some categories permit a null numeric value
    #[serde(default)]
    pub category: KpiCategory,

    /// Fiscal year the value refers to
    pub fiscal_year: i32,

    /// Original textual form as printed on the page; never rewritten
    #[serde(default)]
    pub value_raw: String,

    /// Numeric value as printed, if the claim is quantitative
    #[serde(default)]
    pub value_numeric: Option<f64>,

    /// Magnitude-resolved value (e.g. "12.5" in crores becomes 125_000_000)
    #[serde(default)]
    pub value_actual: Option<f64>,

    /// Unit string, free text at creation, validated by the gatekeeper
    #[serde(default)]
    pub unit: String,

    /// Certainty score in [0, 1]
    pub confidence: f64,

    /// Where the claim was read
    pub source: SourceRef,

    /// Status flags
    #[serde(default)]
    pub flags: ClaimFlags,

    /// Outcome of the self-verification stage
    #[serde(default)]
    pub verification_status: VerificationStatus,

    /// Certainty the verification oracle reported for its judgment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_confidence: Option<f64>,

    /// Deepest review the claim has reached
    #[serde(default)]
    pub review_tier: ReviewTier,

    /// Append-only audit trail of applied corrections and confirmations
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Claim {
    /// Multiply confidence by `factor`, capping at 1.0
    ///
    /// This is the only sanctioned way to raise confidence outside an
    /// explicit oracle judgment.
    pub fn boost_confidence(&mut self, factor: f64) {
        self.confidence = (self.confidence * factor).min(1.0);
    }

    /// Replace confidence with an oracle-reported value, clamped to [0, 1]
    ///
    /// Oracle corrections are the one case where confidence may decrease.
    pub fn set_oracle_confidence(&mut self, confidence: f64) {
        self.confidence = confidence.clamp(0.0, 1.0);
    }

    /// Append an entry to the audit trail
    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Replace both numeric value fields with an oracle-corrected value
    pub fn apply_corrected_value(&mut self, corrected: Option<f64>) {
        self.value_numeric = corrected;
        self.value_actual = corrected;
    }

    /// Render the numeric value for notes and conflict resolutions
    pub fn display_value(&self) -> String {
        match self.value_numeric {
            Some(v) => v.to_string(),
            None => "null".to_string(),
        }
    }
}
