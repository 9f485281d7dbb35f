//! Deterministic mock oracles for testing
//!
//! Modeled on scripted-response mocks: configure per-page (or per-claim)
//! responses and failures up front, then assert on call counts afterwards.
//! No network, no timing.

use crate::error::OracleError;
use crate::images::PageImage;
use crate::types::{ClaimDigest, PageVerification, ReviewVerdict};
use crate::{ReviewOracle, VerificationOracle};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tally_domain::ClaimId;

/// Mock verification oracle with scripted per-page responses
///
/// Pages with no scripted response return an empty correction list, which
/// the pipeline treats as blanket confirmation.
#[derive(Debug, Clone, Default)]
pub struct MockVerificationOracle {
    responses: Arc<Mutex<HashMap<u32, PageVerification>>>,
    failing_pages: Arc<Mutex<HashSet<u32>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockVerificationOracle {
    /// Create a mock that confirms everything by silence
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for a page
    pub fn add_response(&self, response: PageVerification) {
        self.responses
            .lock()
            .unwrap()
            .insert(response.page, response);
    }

    /// Make calls for a page fail with a communication error
    pub fn fail_page(&self, page: u32) {
        self.failing_pages.lock().unwrap().insert(page);
    }

    /// Number of verify calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl VerificationOracle for MockVerificationOracle {
    async fn verify_page(
        &self,
        image: &PageImage,
        _claims: &[ClaimDigest],
        _prompt: &str,
    ) -> Result<PageVerification, OracleError> {
        *self.call_count.lock().unwrap() += 1;

        if self.failing_pages.lock().unwrap().contains(&image.page) {
            return Err(OracleError::Communication("mock failure".to_string()));
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&image.page)
            .cloned()
            .unwrap_or(PageVerification {
                page: image.page,
                review_status: None,
                corrections: Vec::new(),
            }))
    }
}

/// Mock review oracle with scripted per-claim verdicts
///
/// Claims with no scripted verdict fail the call, mirroring an oracle that
/// cannot be reached; configure every claim you expect to be reviewed.
#[derive(Debug, Clone, Default)]
pub struct MockReviewOracle {
    verdicts: Arc<Mutex<HashMap<ClaimId, ReviewVerdict>>>,
    failing_ids: Arc<Mutex<HashSet<ClaimId>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockReviewOracle {
    /// Create a mock with no scripted verdicts
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the verdict for a claim
    pub fn add_verdict(&self, id: ClaimId, verdict: ReviewVerdict) {
        self.verdicts.lock().unwrap().insert(id, verdict);
    }

    /// Make calls for a claim fail with a communication error
    pub fn fail_claim(&self, id: ClaimId) {
        self.failing_ids.lock().unwrap().insert(id);
    }

    /// Number of review calls made so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ReviewOracle for MockReviewOracle {
    async fn review_claim(
        &self,
        _image: &PageImage,
        claim: &ClaimDigest,
        _prompt: &str,
    ) -> Result<ReviewVerdict, OracleError> {
        *self.call_count.lock().unwrap() += 1;

        if self.failing_ids.lock().unwrap().contains(&claim.id) {
            return Err(OracleError::Communication("mock failure".to_string()));
        }

        self.verdicts
            .lock()
            .unwrap()
            .get(&claim.id)
            .cloned()
            .ok_or_else(|| OracleError::Communication("no scripted verdict".to_string()))
    }
}
