//! Tally Gatekeeper
//!
//! Rejects structurally or semantically implausible claims using a fixed,
//! ordered rule chain. The only stage allowed to remove claims, and every
//! removal leaves a reason-coded discard record behind.

#![warn(missing_docs)]

mod config;
mod filter;

pub use config::FilterConfig;
pub use filter::{DiscardReason, FilterOutcome, Gatekeeper};
