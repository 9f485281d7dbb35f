//! Tally Escalation Reviewer
//!
//! Consults a stronger oracle for a final per-claim adjudication of
//! whatever is still uncertain after self-verification. With nothing to
//! escalate, the stage is an explicit, logged no-op.

#![warn(missing_docs)]

mod config;
mod prompt;
mod reviewer;

pub use config::ReviewerConfig;
pub use prompt::build_review_prompt;
pub use reviewer::{ClaimFailure, EscalationReviewer, ReviewOutcome};
