//! Tally Deduplicator
//!
//! Merges multiple raw claims about the same (KPI, fiscal year) into one,
//! detecting and recording conflicts. The first stage of the pipeline and
//! the only one that merges; nothing is ever discarded here.

#![warn(missing_docs)]

mod consolidator;

pub use consolidator::{consolidate, ConsolidationOutcome, CROSS_PAGE_BOOST};
