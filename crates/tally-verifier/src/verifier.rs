//! Core self-verification logic

use crate::config::VerifierConfig;
use crate::prompt::build_verification_prompt;
use std::collections::HashMap;
use tally_domain::{Claim, ClaimId, VerificationStats, VerificationStatus};
use tally_oracle::{
    ClaimCorrection, ClaimDigest, CorrectionStatus, OracleError, PageImageStore, PageVerification,
    RateLimiter, VerificationOracle,
};
use tokio::time::timeout;
use tracing::{info, warn};

/// Confidence multiplier for a claim the oracle explicitly confirmed
pub const CONFIRMATION_BOOST: f64 = 1.05;

/// A page whose oracle call failed; its claims were left untouched
#[derive(Debug, Clone)]
pub struct PageFailure {
    /// The affected page
    pub page: u32,

    /// Human-readable failure description
    pub error: String,
}

/// Result of a verification pass over a claim set
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    /// The full claim set; claims on failed pages are unmodified
    pub claims: Vec<Claim>,

    /// Aggregate confirmed/corrected/flagged/failed-page counts
    pub stats: VerificationStats,

    /// One entry per page whose oracle call failed
    pub failures: Vec<PageFailure>,
}

/// The Self-Verifier resubmits claims to the verification oracle per page
pub struct SelfVerifier<O: VerificationOracle> {
    oracle: O,
    images: PageImageStore,
    config: VerifierConfig,
    limiter: RateLimiter,
}

impl<O: VerificationOracle> SelfVerifier<O> {
    /// Create a new verifier
    pub fn new(oracle: O, images: PageImageStore, config: VerifierConfig) -> Self {
        let limiter = RateLimiter::new(config.min_call_interval());
        Self {
            oracle,
            images,
            config,
            limiter,
        }
    }

    /// Verify a claim set, one oracle call per source page
    ///
    /// Pages are processed in first-seen order. Failures (missing image,
    /// unreachable oracle, timeout, malformed reply) leave that page's
    /// claims byte-identical and are recorded in the outcome.
    pub async fn verify(&self, claims: Vec<Claim>) -> VerificationOutcome {
        let mut order: Vec<u32> = Vec::new();
        let mut pages: HashMap<u32, Vec<Claim>> = HashMap::new();

        for claim in claims {
            let page = claim.source.page;
            let batch = pages.entry(page).or_default();
            if batch.is_empty() {
                order.push(page);
            }
            batch.push(claim);
        }

        info!(pages = order.len(), "starting self-verification");

        let mut stats = VerificationStats::default();
        let mut failures = Vec::new();
        let mut verified = Vec::new();

        for page in order {
            let batch = pages.remove(&page).unwrap_or_default();

            match self.verify_page(page, &batch).await {
                Ok(result) => {
                    verified.extend(apply_corrections(batch, &result, &mut stats));
                }
                Err(e) => {
                    warn!(page, error = %e, "page verification failed, keeping originals");
                    stats.failed_pages += 1;
                    failures.push(PageFailure {
                        page,
                        error: e.to_string(),
                    });
                    verified.extend(batch);
                }
            }
        }

        info!(
            confirmed = stats.confirmed,
            corrected = stats.corrected,
            flagged = stats.flagged,
            failed_pages = stats.failed_pages,
            "self-verification complete"
        );

        VerificationOutcome {
            claims: verified,
            stats,
            failures,
        }
    }

    /// Run the oracle call for one page batch
    async fn verify_page(
        &self,
        page: u32,
        batch: &[Claim],
    ) -> Result<PageVerification, OracleError> {
        let image = self.images.read_page(page)?;
        let digests: Vec<ClaimDigest> = batch.iter().map(ClaimDigest::from).collect();
        let prompt = build_verification_prompt(page, &digests);

        self.limiter.acquire().await;

        timeout(
            self.config.call_timeout(),
            self.oracle.verify_page(&image, &digests, &prompt),
        )
        .await
        .map_err(|_| OracleError::Timeout)?
    }
}

/// Apply a page's corrections to its claim batch
///
/// A claim absent from the correction list defaults to CONFIRMED at its
/// existing confidence: oracle silence is implicit confirmation, never
/// rejection.
fn apply_corrections(
    batch: Vec<Claim>,
    result: &PageVerification,
    stats: &mut VerificationStats,
) -> Vec<Claim> {
    let corrections: HashMap<ClaimId, &ClaimCorrection> =
        result.corrections.iter().map(|c| (c.id, c)).collect();

    batch
        .into_iter()
        .map(|mut claim| {
            match corrections.get(&claim.id) {
                Some(correction) => apply_correction(&mut claim, correction),
                None => {
                    claim.verification_status = VerificationStatus::Confirmed;
                    claim.verification_confidence = Some(claim.confidence);
                }
            }

            match claim.verification_status {
                VerificationStatus::Corrected => stats.corrected += 1,
                VerificationStatus::Flagged => stats.flagged += 1,
                _ => stats.confirmed += 1,
            }

            claim
        })
        .collect()
}

fn apply_correction(claim: &mut Claim, correction: &ClaimCorrection) {
    match correction.status {
        CorrectionStatus::Confirmed => {
            claim.boost_confidence(CONFIRMATION_BOOST);
            claim.verification_status = VerificationStatus::Confirmed;
            claim.verification_confidence =
                Some(correction.verification_confidence.unwrap_or(1.0));
            claim.push_note(if correction.reasoning.is_empty() {
                "Verified in self-review".to_string()
            } else {
                correction.reasoning.clone()
            });
        }
        CorrectionStatus::Corrected => {
            let old = claim.display_value();
            claim.apply_corrected_value(correction.corrected_value);
            let verification_confidence = correction.verification_confidence.unwrap_or(0.9);
            claim.set_oracle_confidence(verification_confidence);
            claim.verification_status = VerificationStatus::Corrected;
            claim.verification_confidence = Some(verification_confidence);
            claim.push_note(format!(
                "Corrected from {} to {}: {}",
                old,
                claim.display_value(),
                correction.reasoning
            ));
        }
        CorrectionStatus::Flagged => {
            claim.verification_status = VerificationStatus::Flagged;
            claim.verification_confidence =
                Some(correction.verification_confidence.unwrap_or(0.5));
            claim.flags.needs_review = true;
            claim.push_note(if correction.reasoning.is_empty() {
                "Flagged in self-review".to_string()
            } else {
                correction.reasoning.clone()
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tally_domain::{ClaimFlags, KpiCategory, ReviewTier, SourceRef};
    use tally_oracle::MockVerificationOracle;
    use tempfile::TempDir;

    fn claim_on_page(name: &str, page: u32, confidence: f64) -> Claim {
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
            verification_status: VerificationStatus::Unverified,
            verification_confidence: None,
            review_tier: ReviewTier::None,
            notes: Vec::new(),
        }
    }

    /// Image directory with renderings for the given pages
    fn images_for(pages: &[u32]) -> (TempDir, PageImageStore) {
        let dir = TempDir::new().unwrap();
        for page in pages {
            fs::write(dir.path().join(format!("page_{:03}.png", page)), b"png").unwrap();
        }
        let store = PageImageStore::from_dir(dir.path());
        (dir, store)
    }

    fn verifier(
        oracle: MockVerificationOracle,
        images: PageImageStore,
    ) -> SelfVerifier<MockVerificationOracle> {
        let config = VerifierConfig {
            call_timeout_secs: 5,
            min_call_interval_ms: 0,
        };
        SelfVerifier::new(oracle, images, config)
    }

    #[tokio::test]
    async fn test_silence_defaults_to_confirmed() {
        let (_dir, images) = images_for(&[3]);
        let oracle = MockVerificationOracle::new();
        let verifier = verifier(oracle, images);

        let input = claim_on_page("Employee Count", 3, 0.8);
        let outcome = verifier.verify(vec![input.clone()]).await;

        let claim = &outcome.claims[0];
        assert_eq!(claim.verification_status, VerificationStatus::Confirmed);
        assert_eq!(claim.value_numeric, input.value_numeric);
        assert_eq!(claim.confidence, 0.8);
        assert_eq!(claim.verification_confidence, Some(0.8));
        assert_eq!(outcome.stats.confirmed, 1);
    }

    #[tokio::test]
    async fn test_explicit_confirmation_boosts() {
        let (_dir, images) = images_for(&[3]);
        let input = claim_on_page("Employee Count", 3, 0.8);

        let oracle = MockVerificationOracle::new();
        oracle.add_response(PageVerification {
            page: 3,
            review_status: Some("CONFIRMED".to_string()),
            corrections: vec![ClaimCorrection {
                id: input.id,
                corrected_value: None,
                status: CorrectionStatus::Confirmed,
                verification_confidence: Some(0.95),
                reasoning: "matches the table".to_string(),
            }],
        });

        let outcome = verifier(oracle, images).verify(vec![input]).await;
        let claim = &outcome.claims[0];

        assert!((claim.confidence - 0.84).abs() < 1e-9);
        assert_eq!(claim.verification_status, VerificationStatus::Confirmed);
        assert_eq!(claim.verification_confidence, Some(0.95));
        assert_eq!(claim.notes, vec!["matches the table"]);
    }

    #[tokio::test]
    async fn test_correction_replaces_value_and_confidence() {
        let (_dir, images) = images_for(&[3]);
        let input = claim_on_page("Employee Count", 3, 0.8);

        let oracle = MockVerificationOracle::new();
        oracle.add_response(PageVerification {
            page: 3,
            review_status: None,
            corrections: vec![ClaimCorrection {
                id: input.id,
                corrected_value: Some(110.0),
                status: CorrectionStatus::Corrected,
                verification_confidence: Some(0.7),
                reasoning: "wrong column".to_string(),
            }],
        });

        let outcome = verifier(oracle, images).verify(vec![input]).await;
        let claim = &outcome.claims[0];

        assert_eq!(claim.value_numeric, Some(110.0));
        assert_eq!(claim.value_actual, Some(110.0));
        assert_eq!(claim.confidence, 0.7);
        assert_eq!(claim.verification_status, VerificationStatus::Corrected);
        assert_eq!(claim.notes, vec!["Corrected from 100 to 110: wrong column"]);
        assert_eq!(outcome.stats.corrected, 1);
    }

    #[tokio::test]
    async fn test_flagging_sets_needs_review() {
        let (_dir, images) = images_for(&[3]);
        let input = claim_on_page("Employee Count", 3, 0.8);

        let oracle = MockVerificationOracle::new();
        oracle.add_response(PageVerification {
            page: 3,
            review_status: None,
            corrections: vec![ClaimCorrection {
                id: input.id,
                corrected_value: None,
                status: CorrectionStatus::Flagged,
                verification_confidence: Some(0.4),
                reasoning: "footnote ambiguity".to_string(),
            }],
        });

        let outcome = verifier(oracle, images).verify(vec![input]).await;
        let claim = &outcome.claims[0];

        assert_eq!(claim.verification_status, VerificationStatus::Flagged);
        assert!(claim.flags.needs_review);
        assert_eq!(claim.confidence, 0.8);
        assert_eq!(outcome.stats.flagged, 1);
    }

    #[tokio::test]
    async fn test_failed_page_leaves_claims_untouched() {
        let (_dir, images) = images_for(&[3, 7]);
        let good = claim_on_page("Employee Count", 3, 0.8);
        let stranded = claim_on_page("Store Count", 7, 0.6);
        let stranded_expected = stranded.clone();

        let oracle = MockVerificationOracle::new();
        oracle.fail_page(7);

        let outcome = verifier(oracle, images)
            .verify(vec![good, stranded])
            .await;

        assert_eq!(outcome.stats.failed_pages, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].page, 7);

        let untouched = outcome
            .claims
            .iter()
            .find(|c| c.source.page == 7)
            .unwrap();
        assert_eq!(*untouched, stranded_expected);

        // The other page still went through.
        let confirmed = outcome.claims.iter().find(|c| c.source.page == 3).unwrap();
        assert_eq!(confirmed.verification_status, VerificationStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_missing_image_is_a_page_failure() {
        let (_dir, images) = images_for(&[3]);
        let stranded = claim_on_page("Store Count", 9, 0.6);

        let oracle = MockVerificationOracle::new();
        let outcome = verifier(oracle.clone(), images).verify(vec![stranded]).await;

        assert_eq!(outcome.stats.failed_pages, 1);
        assert_eq!(
            outcome.claims[0].verification_status,
            VerificationStatus::Unverified
        );
        // The oracle was never consulted for a page with no image.
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_one_call_per_page() {
        let (_dir, images) = images_for(&[3, 4]);
        let oracle = MockVerificationOracle::new();

        let claims = vec![
            claim_on_page("A Metric", 3, 0.8),
            claim_on_page("B Metric", 3, 0.8),
            claim_on_page("C Metric", 4, 0.8),
        ];

        let outcome = verifier(oracle.clone(), images).verify(claims).await;
        assert_eq!(oracle.call_count(), 2);
        assert_eq!(outcome.stats.confirmed, 3);
    }
}
