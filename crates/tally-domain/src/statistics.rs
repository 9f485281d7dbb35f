//! Summary statistics over a claim set

use crate::claim::Claim;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics recomputed after the deduplication and filter stages
///
/// Maps use `BTreeMap` so serialized artifacts are byte-stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Claim count per category label
    pub kpis_by_category: BTreeMap<String, usize>,

    /// Claim count per fiscal year
    pub kpis_by_fiscal_year: BTreeMap<i32, usize>,

    /// Fiscal years present, newest first
    pub fiscal_years_covered: Vec<i32>,

    /// Mean confidence over the set, rounded to 3 decimals
    pub average_confidence: f64,

    /// Claims with confidence >= 0.85
    pub high_confidence_count: usize,

    /// Claims with confidence in [0.70, 0.85)
    pub medium_confidence_count: usize,

    /// Claims with confidence < 0.70
    pub low_confidence_count: usize,

    /// Claims currently flagged for review
    pub needs_review_count: usize,
}

impl Statistics {
    /// Compute statistics over a claim set
    pub fn from_claims(claims: &[Claim]) -> Self {
        if claims.is_empty() {
            return Self::default();
        }

        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
        let mut confidence_sum = 0.0;
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        let mut needs_review = 0;

        for claim in claims {
            *by_category
                .entry(claim.category.as_str().to_string())
                .or_insert(0) += 1;
            *by_year.entry(claim.fiscal_year).or_insert(0) += 1;

            confidence_sum += claim.confidence;
            if claim.confidence >= 0.85 {
                high += 1;
            } else if claim.confidence >= 0.70 {
                medium += 1;
            } else {
                low += 1;
            }

            if claim.flags.needs_review {
                needs_review += 1;
            }
        }

        let mut years: Vec<i32> = by_year.keys().copied().collect();
        years.sort_unstable_by(|a, b| b.cmp(a));

        let average = confidence_sum / claims.len() as f64;

        Self {
            kpis_by_category: by_category,
            kpis_by_fiscal_year: by_year,
            fiscal_years_covered: years,
            average_confidence: (average * 1000.0).round() / 1000.0,
            high_confidence_count: high,
            medium_confidence_count: medium,
            low_confidence_count: low,
            needs_review_count: needs_review,
        }
    }
}

/// Aggregate counts produced by the self-verification stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStats {
    /// Claims the oracle confirmed (explicitly or by silence)
    pub confirmed: usize,

    /// Claims the oracle corrected
    pub corrected: usize,

    /// Claims the oracle flagged for escalation
    pub flagged: usize,

    /// Pages whose oracle call failed and whose claims were left untouched
    pub failed_pages: usize,
}

/// Aggregate counts produced by the escalation review stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Candidates submitted for review
    pub total_reviewed: usize,

    /// Candidates the review oracle confirmed
    pub confirmed: usize,

    /// Candidates the review oracle corrected
    pub corrected: usize,

    /// Candidates left ambiguous, requiring a human
    pub still_ambiguous: usize,

    /// Candidates whose review call failed; left in pre-escalation state
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::KpiCategory;
    use crate::claim::{ClaimFlags, ClaimId, SourceRef};
    use crate::status::{ReviewTier, VerificationStatus};

    fn claim(category: KpiCategory, year: i32, confidence: f64, needs_review: bool) -> Claim {
        Claim {
            id: ClaimId::new(),
            kpi_name: "KPI".to_string(),
            kpi_description: None,
            category,
            fiscal_year: year,
            value_raw: String::new(),
            value_numeric: Some(1.0),
            value_actual: Some(1.0),
            unit: "count".to_string(),
            confidence,
            source: SourceRef {
                page: 1,
                section: String::new(),
            },
            flags: ClaimFlags {
                needs_review,
                conflicting_values: false,
            },
            verification_status: VerificationStatus::Unverified,
            verification_confidence: None,
            review_tier: ReviewTier::None,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_empty_set() {
        let stats = Statistics::from_claims(&[]);
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_confidence_buckets() {
        let claims = vec![
            claim(KpiCategory::Operational, 2024, 0.9, false),
            claim(KpiCategory::Operational, 2024, 0.85, false),
            claim(KpiCategory::Financial, 2023, 0.7, true),
            claim(KpiCategory::Financial, 2023, 0.4, false),
        ];
        let stats = Statistics::from_claims(&claims);

        assert_eq!(stats.high_confidence_count, 2);
        assert_eq!(stats.medium_confidence_count, 1);
        assert_eq!(stats.low_confidence_count, 1);
        assert_eq!(stats.needs_review_count, 1);
        assert_eq!(stats.average_confidence, 0.713);
    }

    #[test]
    fn test_years_newest_first() {
        let claims = vec![
            claim(KpiCategory::Operational, 2022, 0.9, false),
            claim(KpiCategory::Operational, 2024, 0.9, false),
            claim(KpiCategory::Operational, 2023, 0.9, false),
        ];
        let stats = Statistics::from_claims(&claims);
        assert_eq!(stats.fiscal_years_covered, vec![2024, 2023, 2022]);
        assert_eq!(stats.kpis_by_fiscal_year.get(&2024), Some(&1));
    }

    #[test]
    fn test_category_counts() {
        let claims = vec![
            claim(KpiCategory::Operational, 2024, 0.9, false),
            claim(KpiCategory::Operational, 2024, 0.9, false),
            claim(KpiCategory::Governance, 2024, 0.9, false),
        ];
        let stats = Statistics::from_claims(&claims);
        assert_eq!(stats.kpis_by_category.get("operational"), Some(&2));
        assert_eq!(stats.kpis_by_category.get("governance"), Some(&1));
    }
}
