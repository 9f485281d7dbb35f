//! Conflict records emitted by the deduplicator

use serde::{Deserialize, Serialize};

/// One distinct value observed for a conflicted (KPI, fiscal year) key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateValue {
    /// The numeric value, or null for a qualitative claim
    pub value: Option<f64>,

    /// Page the value was read from
    pub source_page: u32,

    /// Confidence of the claim that carried this value
    pub confidence: f64,
}

/// Record of a divergent-value group found during deduplication
///
/// Not an error: conflicts are first-class output that the escalation
/// stages (or a human) resolve later. The surviving claim keeps the
/// highest-confidence value and is flagged for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// KPI label shared by the conflicting claims
    pub kpi_name: String,

    /// Fiscal year shared by the conflicting claims
    pub fiscal_year: i32,

    /// Every distinct candidate value with its provenance, in input order
    pub values: Vec<CandidateValue>,

    /// How the deduplicator resolved the group
    pub resolution: String,
}
