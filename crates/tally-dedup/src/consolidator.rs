//! Deduplication of raw claims by (KPI name, fiscal year)

use std::collections::HashMap;
use tally_domain::{CandidateValue, Claim, Conflict};
use tracing::{debug, warn};

/// Confidence multiplier applied when independent pages agree on a value
pub const CROSS_PAGE_BOOST: f64 = 1.1;

/// Result of a deduplication pass
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    /// At most one claim per (KPI name, fiscal year)
    pub claims: Vec<Claim>,

    /// One record per divergent-value group, in first-seen order
    pub conflicts: Vec<Conflict>,

    /// Claim count before merging
    pub total_raw: usize,
}

/// Deduplicate a raw claim set
///
/// Grouping is order-preserving and the tie-break on equal confidence is
/// first-encountered-wins, so the result is deterministic for a given
/// input order. Rerunning on the output is a no-op: every group is then a
/// singleton and passes through untouched.
pub fn consolidate(claims: Vec<Claim>) -> ConsolidationOutcome {
    let total_raw = claims.len();

    // Explicit order-preserving grouping: group order is first-seen order.
    let mut order: Vec<(String, i32)> = Vec::new();
    let mut groups: HashMap<(String, i32), Vec<Claim>> = HashMap::new();

    for claim in claims {
        let key = (claim.kpi_name.clone(), claim.fiscal_year);
        let group = groups.entry(key.clone()).or_default();
        if group.is_empty() {
            order.push(key);
        }
        group.push(claim);
    }

    let mut deduplicated = Vec::with_capacity(order.len());
    let mut conflicts = Vec::new();

    for key in order {
        let group = groups.remove(&key).unwrap_or_default();
        match merge_group(group) {
            (claim, None) => deduplicated.push(claim),
            (claim, Some(conflict)) => {
                warn!(
                    kpi = %conflict.kpi_name,
                    fiscal_year = conflict.fiscal_year,
                    candidates = conflict.values.len(),
                    "conflicting values, keeping highest confidence"
                );
                deduplicated.push(claim);
                conflicts.push(conflict);
            }
        }
    }

    debug!(
        raw = total_raw,
        unique = deduplicated.len(),
        conflicts = conflicts.len(),
        "deduplication complete"
    );

    ConsolidationOutcome {
        claims: deduplicated,
        conflicts,
        total_raw,
    }
}

/// Merge one (KPI, fiscal year) group into a single claim
fn merge_group(mut group: Vec<Claim>) -> (Claim, Option<Conflict>) {
    if group.len() == 1 {
        return (group.remove(0), None);
    }

    let distinct = distinct_values(&group);
    let best_idx = highest_confidence_index(&group);
    let pages: Vec<u32> = group.iter().map(|c| c.source.page).collect();

    if distinct.len() == 1 {
        // Same value on several pages: corroboration, not conflict.
        let mut best = group.swap_remove(best_idx);
        best.boost_confidence(CROSS_PAGE_BOOST);
        best.push_note(format!("Confirmed across pages: {:?}", pages));
        return (best, None);
    }

    // Divergent values: keep the most confident claim and flag it.
    let mut best = group[best_idx].clone();
    best.flags.conflicting_values = true;
    best.flags.needs_review = true;

    let conflict = Conflict {
        kpi_name: best.kpi_name.clone(),
        fiscal_year: best.fiscal_year,
        values: distinct,
        resolution: format!(
            "Selected value {} (highest confidence)",
            best.display_value()
        ),
    };

    (best, Some(conflict))
}

/// One candidate entry per distinct value, from the first claim holding it
fn distinct_values(group: &[Claim]) -> Vec<CandidateValue> {
    let mut seen: Vec<Option<u64>> = Vec::new();
    let mut candidates = Vec::new();

    for claim in group {
        let bits = claim.value_numeric.map(f64::to_bits);
        if !seen.contains(&bits) {
            seen.push(bits);
            candidates.push(CandidateValue {
                value: claim.value_numeric,
                source_page: claim.source.page,
                confidence: claim.confidence,
            });
        }
    }

    candidates
}

/// Index of the group's most confident claim; first-seen wins ties
fn highest_confidence_index(group: &[Claim]) -> usize {
    let mut best = 0;
    for (idx, claim) in group.iter().enumerate().skip(1) {
        if claim.confidence > group[best].confidence {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::{
        ClaimFlags, ClaimId, KpiCategory, ReviewTier, SourceRef, VerificationStatus,
    };

    fn claim(name: &str, year: i32, value: Option<f64>, confidence: f64, page: u32) -> Claim {
        Claim {
            id: ClaimId::new(),
            kpi_name: name.to_string(),
            kpi_description: None,
            category: KpiCategory::Operational,
            fiscal_year: year,
            value_raw: value.map(|v| v.to_string()).unwrap_or_default(),
            value_numeric: value,
            value_actual: value,
            unit: "count".to_string(),
            confidence,
            source: SourceRef {
                page,
                section: String::new(),
            },
            flags: ClaimFlags::default(),
            verification_status: VerificationStatus::Unverified,
            verification_confidence: None,
            review_tier: ReviewTier::None,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_singleton_passes_through_unchanged() {
        let input = claim("Employee Count", 2024, Some(15000.0), 0.8, 12);
        let expected = input.clone();
        let outcome = consolidate(vec![input]);

        assert_eq!(outcome.claims, vec![expected]);
        assert!(outcome.conflicts.is_empty());
        assert_eq!(outcome.total_raw, 1);
    }

    #[test]
    fn test_identical_values_merge_with_boost() {
        let outcome = consolidate(vec![
            claim("Employee Count", 2024, Some(15000.0), 0.8, 12),
            claim("Employee Count", 2024, Some(15000.0), 0.6, 45),
        ]);

        assert_eq!(outcome.claims.len(), 1);
        assert!(outcome.conflicts.is_empty());

        let merged = &outcome.claims[0];
        assert!((merged.confidence - 0.88).abs() < 1e-9);
        assert_eq!(merged.source.page, 12);
        assert_eq!(merged.notes, vec!["Confirmed across pages: [12, 45]"]);
        assert!(!merged.flags.needs_review);
    }

    #[test]
    fn test_boost_caps_at_one() {
        let outcome = consolidate(vec![
            claim("ARPU", 2024, Some(182.0), 0.95, 3),
            claim("ARPU", 2024, Some(182.0), 0.9, 8),
        ]);
        assert_eq!(outcome.claims[0].confidence, 1.0);
    }

    #[test]
    fn test_divergent_values_produce_conflict() {
        let outcome = consolidate(vec![
            claim("Store Count", 2024, Some(410.0), 0.6, 7),
            claim("Store Count", 2024, Some(415.0), 0.9, 31),
        ]);

        assert_eq!(outcome.claims.len(), 1);
        assert_eq!(outcome.conflicts.len(), 1);

        let survivor = &outcome.claims[0];
        assert_eq!(survivor.value_numeric, Some(415.0));
        assert!(survivor.flags.needs_review);
        assert!(survivor.flags.conflicting_values);

        let conflict = &outcome.conflicts[0];
        assert_eq!(conflict.kpi_name, "Store Count");
        assert_eq!(conflict.values.len(), 2);
        assert_eq!(conflict.values[0].value, Some(410.0));
        assert_eq!(conflict.values[0].source_page, 7);
        assert_eq!(conflict.values[1].value, Some(415.0));
        assert_eq!(conflict.resolution, "Selected value 415 (highest confidence)");
    }

    #[test]
    fn test_conflict_lists_distinct_values_only() {
        // Three claims, two distinct values: the record must have exactly two entries.
        let outcome = consolidate(vec![
            claim("Store Count", 2024, Some(410.0), 0.6, 7),
            claim("Store Count", 2024, Some(410.0), 0.5, 19),
            claim("Store Count", 2024, Some(415.0), 0.9, 31),
        ]);

        let conflict = &outcome.conflicts[0];
        assert_eq!(conflict.values.len(), 2);
        assert_eq!(conflict.values[0].source_page, 7);
        assert_eq!(conflict.values[1].source_page, 31);
    }

    #[test]
    fn test_equal_confidence_first_seen_wins() {
        let first = claim("Store Count", 2024, Some(410.0), 0.8, 7);
        let first_id = first.id;
        let outcome = consolidate(vec![
            first,
            claim("Store Count", 2024, Some(415.0), 0.8, 31),
        ]);

        assert_eq!(outcome.claims[0].id, first_id);
        assert_eq!(outcome.claims[0].value_numeric, Some(410.0));
    }

    #[test]
    fn test_null_value_counts_as_a_candidate() {
        let outcome = consolidate(vec![
            claim("Guidance", 2025, None, 0.7, 3),
            claim("Guidance", 2025, Some(5.0), 0.6, 9),
        ]);

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].values.len(), 2);
        assert_eq!(outcome.claims[0].value_numeric, None);
    }

    #[test]
    fn test_group_order_is_first_seen() {
        let outcome = consolidate(vec![
            claim("B", 2024, Some(1.0), 0.8, 1),
            claim("A", 2024, Some(2.0), 0.8, 2),
            claim("B", 2024, Some(1.0), 0.7, 3),
        ]);

        let names: Vec<&str> = outcome.claims.iter().map(|c| c.kpi_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let outcome = consolidate(vec![
            claim("Employee Count", 2024, Some(15000.0), 0.8, 12),
            claim("Employee Count", 2024, Some(15000.0), 0.6, 45),
            claim("Store Count", 2024, Some(410.0), 0.6, 7),
            claim("Store Count", 2024, Some(415.0), 0.9, 31),
        ]);

        let again = consolidate(outcome.claims.clone());
        assert_eq!(again.claims, outcome.claims);
        assert!(again.conflicts.is_empty());
    }
}
