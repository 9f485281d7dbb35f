//! Tally Oracle Layer
//!
//! Pluggable visual-oracle implementations for the verification and
//! escalation stages.
//!
//! # Architecture
//!
//! Two traits define the contracts the pipeline depends on:
//!
//! - [`VerificationOracle`]: first-pass review of a whole page batch,
//!   returning per-claim corrections
//! - [`ReviewOracle`]: stronger final adjudication of a single claim
//!
//! # Providers
//!
//! - [`GeminiOracle`]: hosted vision model over the Generative Language API
//! - [`MockVerificationOracle`] / [`MockReviewOracle`]: deterministic mocks
//!   for testing, with scripted responses and call counting
//!
//! The crate also owns the supporting pieces both stages share: page-image
//! resolution ([`PageImageStore`]), the minimum-interval [`RateLimiter`],
//! and fence-tolerant JSON response parsing.

#![warn(missing_docs)]

mod error;
mod gemini;
mod images;
mod mock;
mod parser;
mod rate;
mod types;

pub use error::OracleError;
pub use gemini::{GeminiOracle, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use images::{PageImage, PageImageStore};
pub use mock::{MockReviewOracle, MockVerificationOracle};
pub use parser::parse_oracle_response;
pub use rate::RateLimiter;
pub use types::{
    ClaimCorrection, ClaimDigest, CorrectionStatus, PageVerification, ReviewDecision,
    ReviewVerdict,
};

use async_trait::async_trait;

/// First-pass visual oracle: re-checks a page's claims in one call
///
/// Implementations must be safe to call concurrently; the pipeline may
/// parallelize page batches behind a shared [`RateLimiter`].
#[async_trait]
pub trait VerificationOracle: Send + Sync {
    /// Submit a page image with the simplified claim list for review
    ///
    /// Any error return means "no judgment available for this page"; the
    /// caller leaves the page's claims untouched and moves on.
    async fn verify_page(
        &self,
        image: &PageImage,
        claims: &[ClaimDigest],
        prompt: &str,
    ) -> Result<PageVerification, OracleError>;
}

/// Final adjudication oracle: judges one claim at a time
#[async_trait]
pub trait ReviewOracle: Send + Sync {
    /// Submit a single claim with its page image for adjudication
    ///
    /// Any error return leaves the claim in its pre-escalation state.
    async fn review_claim(
        &self,
        image: &PageImage,
        claim: &ClaimDigest,
        prompt: &str,
    ) -> Result<ReviewVerdict, OracleError>;
}
