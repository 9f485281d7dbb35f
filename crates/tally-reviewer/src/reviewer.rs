//! Core escalation review logic

use crate::config::ReviewerConfig;
use crate::prompt::build_review_prompt;
use std::collections::HashMap;
use tally_domain::{Claim, ClaimId, ReviewStats, ReviewTier, VerificationStatus};
use tally_oracle::{
    ClaimDigest, OracleError, PageImageStore, RateLimiter, ReviewDecision, ReviewOracle,
    ReviewVerdict,
};
use tokio::time::timeout;
use tracing::{info, warn};

/// A claim whose review call failed; it keeps its pre-escalation state
#[derive(Debug, Clone)]
pub struct ClaimFailure {
    /// Id of the affected claim
    pub id: ClaimId,

    /// KPI label, for log readability
    pub kpi_name: String,

    /// Human-readable failure description
    pub error: String,
}

/// Result of an escalation review pass
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// The full claim set with review results applied
    pub claims: Vec<Claim>,

    /// Aggregate review counts
    pub stats: ReviewStats,

    /// One entry per candidate whose review call failed
    pub failures: Vec<ClaimFailure>,
}

/// The Escalation Reviewer adjudicates residual uncertainty claim-by-claim
pub struct EscalationReviewer<O: ReviewOracle> {
    oracle: O,
    images: PageImageStore,
    config: ReviewerConfig,
    limiter: RateLimiter,
}

impl<O: ReviewOracle> EscalationReviewer<O> {
    /// Create a new reviewer
    pub fn new(oracle: O, images: PageImageStore, config: ReviewerConfig) -> Self {
        let limiter = RateLimiter::new(config.min_call_interval());
        Self {
            oracle,
            images,
            config,
            limiter,
        }
    }

    /// Whether a claim meets any escalation trigger
    fn needs_escalation(&self, claim: &Claim) -> bool {
        claim.flags.needs_review
            || claim.verification_status == VerificationStatus::Flagged
            || claim.confidence < self.config.confidence_threshold
    }

    /// Review every claim that meets an escalation trigger
    ///
    /// With an empty candidate set the stage short-circuits and the output
    /// is bit-identical to the input. Each candidate gets one rate-limited
    /// oracle call; a failed call is recorded and the claim stays in its
    /// pre-escalation state.
    pub async fn review(&self, claims: Vec<Claim>) -> ReviewOutcome {
        let candidates: Vec<usize> = claims
            .iter()
            .enumerate()
            .filter(|(_, c)| self.needs_escalation(c))
            .map(|(idx, _)| idx)
            .collect();

        if candidates.is_empty() {
            info!("no claims meet an escalation trigger, skipping review");
            return ReviewOutcome {
                claims,
                stats: ReviewStats::default(),
                failures: Vec::new(),
            };
        }

        info!(candidates = candidates.len(), "starting escalation review");

        let mut verdicts: HashMap<ClaimId, ReviewVerdict> = HashMap::new();
        let mut failures = Vec::new();
        let mut stats = ReviewStats {
            total_reviewed: candidates.len(),
            ..Default::default()
        };

        for idx in &candidates {
            let claim = &claims[*idx];
            match self.review_claim(claim).await {
                Ok(verdict) => {
                    match verdict.decision {
                        ReviewDecision::Correct => stats.confirmed += 1,
                        ReviewDecision::Incorrect => stats.corrected += 1,
                        ReviewDecision::Ambiguous => stats.still_ambiguous += 1,
                    }
                    verdicts.insert(claim.id, verdict);
                }
                Err(e) => {
                    warn!(kpi = %claim.kpi_name, error = %e, "review failed, keeping pre-escalation state");
                    stats.failed += 1;
                    failures.push(ClaimFailure {
                        id: claim.id,
                        kpi_name: claim.kpi_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let reviewed = claims
            .into_iter()
            .map(|mut claim| {
                if let Some(verdict) = verdicts.get(&claim.id) {
                    apply_verdict(&mut claim, verdict);
                }
                claim
            })
            .collect();

        info!(
            confirmed = stats.confirmed,
            corrected = stats.corrected,
            still_ambiguous = stats.still_ambiguous,
            failed = stats.failed,
            "escalation review complete"
        );

        ReviewOutcome {
            claims: reviewed,
            stats,
            failures,
        }
    }

    /// Run the oracle call for one candidate
    async fn review_claim(&self, claim: &Claim) -> Result<ReviewVerdict, OracleError> {
        let image = self.images.read_page(claim.source.page)?;
        let digest = ClaimDigest::from(claim);
        let prompt = build_review_prompt(claim);

        self.limiter.acquire().await;

        timeout(
            self.config.call_timeout(),
            self.oracle.review_claim(&image, &digest, &prompt),
        )
        .await
        .map_err(|_| OracleError::Timeout)?
    }
}

fn apply_verdict(claim: &mut Claim, verdict: &ReviewVerdict) {
    match verdict.decision {
        ReviewDecision::Correct => {
            claim.flags.needs_review = false;
            claim.set_oracle_confidence(verdict.review_confidence.unwrap_or(0.95));
            claim.review_tier = ReviewTier::Automatic;
            claim.push_note(format!(
                "Confirmed on escalation review: {}",
                verdict.reasoning
            ));
        }
        ReviewDecision::Incorrect => {
            let old = claim.display_value();
            claim.apply_corrected_value(verdict.corrected_value);
            claim.set_oracle_confidence(verdict.review_confidence.unwrap_or(0.90));
            claim.flags.needs_review = false;
            claim.review_tier = ReviewTier::Automatic;
            claim.push_note(format!(
                "Corrected on escalation review from {} to {}: {}",
                old,
                claim.display_value(),
                verdict.reasoning
            ));
        }
        ReviewDecision::Ambiguous => {
            claim.flags.needs_review = true;
            claim.review_tier = ReviewTier::Manual;
            let mut note = format!("Could not resolve: {}", verdict.reasoning);
            if let Some(context) = &verdict.additional_context {
                note.push_str(&format!(" (needs: {})", context));
            }
            claim.push_note(note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tally_domain::{ClaimFlags, KpiCategory, SourceRef};
    use tally_oracle::MockReviewOracle;
    use tempfile::TempDir;

    fn claim(name: &str, page: u32, confidence: f64) -> Claim {
        Claim {
            id: ClaimId::new(),
            kpi_name: name.to_string(),
            kpi_description: None,
            category: KpiCategory::Operational,
            fiscal_year: 2024,
            value_raw: "100".to_string(),
            value_numeric: Some(100.0),
            value_actual: Some(100.0),
            unit: "count".to_string(),
            confidence,
            source: SourceRef {
                page,
                section: String::new(),
            },
            flags: ClaimFlags::default(),
            verification_status: VerificationStatus::Confirmed,
            verification_confidence: Some(confidence),
            review_tier: ReviewTier::None,
            notes: Vec::new(),
        }
    }

    fn images_for(pages: &[u32]) -> (TempDir, PageImageStore) {
        let dir = TempDir::new().unwrap();
        for page in pages {
            fs::write(dir.path().join(format!("page_{:03}.png", page)), b"png").unwrap();
        }
        let store = PageImageStore::from_dir(dir.path());
        (dir, store)
    }

    fn reviewer(
        oracle: MockReviewOracle,
        images: PageImageStore,
    ) -> EscalationReviewer<MockReviewOracle> {
        let config = ReviewerConfig {
            confidence_threshold: 0.70,
            call_timeout_secs: 5,
            min_call_interval_ms: 0,
        };
        EscalationReviewer::new(oracle, images, config)
    }

    fn verdict(decision: ReviewDecision, value: Option<f64>, confidence: f64) -> ReviewVerdict {
        ReviewVerdict {
            decision,
            corrected_value: value,
            review_confidence: Some(confidence),
            reasoning: "checked against the page".to_string(),
            additional_context: None,
        }
    }

    #[tokio::test]
    async fn test_short_circuit_with_no_candidates() {
        let (_dir, images) = images_for(&[1]);
        let oracle = MockReviewOracle::new();

        let input = vec![claim("Employee Count", 1, 0.9), claim("Store Count", 1, 0.85)];
        let expected = input.clone();

        let outcome = reviewer(oracle.clone(), images).review(input).await;

        assert_eq!(outcome.claims, expected);
        assert_eq!(outcome.stats, ReviewStats::default());
        assert!(outcome.failures.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_low_confidence_triggers_escalation() {
        let (_dir, images) = images_for(&[1]);
        let low = claim("Store Count", 1, 0.5);
        let oracle = MockReviewOracle::new();
        oracle.add_verdict(low.id, verdict(ReviewDecision::Correct, None, 0.95));

        let outcome = reviewer(oracle, images).review(vec![low]).await;
        let reviewed = &outcome.claims[0];

        assert_eq!(reviewed.review_tier, ReviewTier::Automatic);
        assert_eq!(reviewed.confidence, 0.95);
        assert!(!reviewed.flags.needs_review);
        assert_eq!(outcome.stats.confirmed, 1);
        assert_eq!(outcome.stats.total_reviewed, 1);
    }

    #[tokio::test]
    async fn test_flagged_status_triggers_escalation() {
        let (_dir, images) = images_for(&[1]);
        let mut flagged = claim("Store Count", 1, 0.9);
        flagged.verification_status = VerificationStatus::Flagged;

        let oracle = MockReviewOracle::new();
        oracle.add_verdict(flagged.id, verdict(ReviewDecision::Correct, None, 0.9));

        let outcome = reviewer(oracle.clone(), images).review(vec![flagged]).await;
        assert_eq!(oracle.call_count(), 1);
        assert_eq!(outcome.stats.total_reviewed, 1);
    }

    #[tokio::test]
    async fn test_incorrect_replaces_value() {
        let (_dir, images) = images_for(&[1]);
        let mut wrong = claim("Store Count", 1, 0.6);
        wrong.flags.needs_review = true;

        let oracle = MockReviewOracle::new();
        oracle.add_verdict(wrong.id, verdict(ReviewDecision::Incorrect, Some(120.0), 0.9));

        let outcome = reviewer(oracle, images).review(vec![wrong]).await;
        let reviewed = &outcome.claims[0];

        assert_eq!(reviewed.value_numeric, Some(120.0));
        assert_eq!(reviewed.value_actual, Some(120.0));
        assert_eq!(reviewed.confidence, 0.9);
        assert!(!reviewed.flags.needs_review);
        assert_eq!(reviewed.review_tier, ReviewTier::Automatic);
        assert_eq!(outcome.stats.corrected, 1);
        assert!(reviewed.notes[0].starts_with("Corrected on escalation review from 100 to 120"));
    }

    #[tokio::test]
    async fn test_ambiguous_is_terminal_manual() {
        let (_dir, images) = images_for(&[1]);
        let mut unclear = claim("Store Count", 1, 0.6);
        unclear.flags.needs_review = true;

        let oracle = MockReviewOracle::new();
        oracle.add_verdict(
            unclear.id,
            ReviewVerdict {
                decision: ReviewDecision::Ambiguous,
                corrected_value: None,
                review_confidence: Some(0.4),
                reasoning: "two plausible columns".to_string(),
                additional_context: Some("the prior-year report".to_string()),
            },
        );

        let outcome = reviewer(oracle, images).review(vec![unclear]).await;
        let reviewed = &outcome.claims[0];

        assert!(reviewed.flags.needs_review);
        assert_eq!(reviewed.review_tier, ReviewTier::Manual);
        assert_eq!(outcome.stats.still_ambiguous, 1);
        assert!(reviewed.notes[0].contains("two plausible columns"));
        assert!(reviewed.notes[0].contains("the prior-year report"));
    }

    #[tokio::test]
    async fn test_failed_call_keeps_pre_escalation_state() {
        let (_dir, images) = images_for(&[1]);
        let mut stranded = claim("Store Count", 1, 0.6);
        stranded.verification_status = VerificationStatus::Flagged;
        stranded.flags.needs_review = true;
        let expected = stranded.clone();

        let oracle = MockReviewOracle::new();
        oracle.fail_claim(stranded.id);

        let outcome = reviewer(oracle, images).review(vec![stranded]).await;

        assert_eq!(outcome.claims[0], expected);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].kpi_name, "Store Count");
    }

    #[tokio::test]
    async fn test_missing_image_is_a_claim_failure() {
        let (_dir, images) = images_for(&[]);
        let mut stranded = claim("Store Count", 5, 0.6);
        stranded.flags.needs_review = true;
        let expected = stranded.clone();

        let oracle = MockReviewOracle::new();
        let outcome = reviewer(oracle.clone(), images).review(vec![stranded]).await;

        assert_eq!(outcome.claims[0], expected);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_untriggered_claims_pass_through() {
        let (_dir, images) = images_for(&[1]);
        let settled = claim("Employee Count", 1, 0.9);
        let mut shaky = claim("Store Count", 1, 0.5);
        shaky.flags.needs_review = true;
        let settled_expected = settled.clone();

        let oracle = MockReviewOracle::new();
        oracle.add_verdict(shaky.id, verdict(ReviewDecision::Correct, None, 0.95));

        let outcome = reviewer(oracle, images).review(vec![settled, shaky]).await;

        assert_eq!(outcome.claims[0], settled_expected);
        assert_eq!(outcome.claims[1].review_tier, ReviewTier::Automatic);
    }
}
