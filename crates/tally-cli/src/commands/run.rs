//! The run command: the whole pipeline in one invocation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tally_artifact::{
    load_artifact, save_artifact, stage_output_path, ConsolidatedArtifact, FilteredArtifact,
    RawClaimsArtifact, ReviewedArtifact, VerifiedArtifact,
};
use tally_dedup::consolidate;
use tally_domain::Statistics;
use tally_gatekeeper::Gatekeeper;
use tally_oracle::PageImageStore;
use tally_reviewer::EscalationReviewer;
use tally_verifier::SelfVerifier;

/// Execute the run command: consolidate, filter, verify, review.
///
/// Each stage's artifact is written as it completes, so a later failure
/// leaves the earlier artifacts usable for a partial re-run.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let raw: RawClaimsArtifact = load_artifact(&args.input)?;
    let document_id = raw.document_id;
    let total_raw = raw.extractions.len();

    // Oracle plumbing is set up front so a bad manifest or missing API key
    // fails before any artifact is written.
    let images = PageImageStore::from_manifest(&args.manifest)?;
    let oracle = config.oracle.build()?;

    // Stage 1: deduplicate
    let dedup = consolidate(raw.extractions);
    let consolidated = ConsolidatedArtifact {
        document_id: document_id.clone(),
        total_raw_extractions: total_raw,
        total_unique_extractions: dedup.claims.len(),
        extractions: dedup.claims.clone(),
        conflicts: dedup.conflicts,
        statistics: Statistics::from_claims(&dedup.claims),
    };
    save_artifact(
        &stage_output_path(&args.output_dir, &document_id, "consolidated"),
        &consolidated,
    )?;
    println!(
        "{}",
        formatter.success(&format!(
            "Consolidated: {} raw -> {} unique, {} conflicts",
            total_raw,
            consolidated.total_unique_extractions,
            consolidated.conflicts.len()
        ))
    );

    // Stage 2: filter
    let gatekeeper = Gatekeeper::new(config.filter.clone());
    let filtered = gatekeeper.filter(dedup.claims);
    let total_before = consolidated.total_unique_extractions;
    let filtered_artifact = FilteredArtifact {
        document_id: document_id.clone(),
        total_before_filtering: total_before,
        total_after_filtering: filtered.retained.len(),
        total_discarded: filtered.discarded.len(),
        discard_rate: if total_before > 0 {
            (filtered.discarded.len() as f64 / total_before as f64 * 1000.0).round() / 1000.0
        } else {
            0.0
        },
        extractions: filtered.retained.clone(),
        discarded: filtered.discarded,
        statistics: Statistics::from_claims(&filtered.retained),
    };
    save_artifact(
        &stage_output_path(&args.output_dir, &document_id, "filtered"),
        &filtered_artifact,
    )?;
    println!(
        "{}",
        formatter.success(&format!(
            "Filtered: {} valid, {} discarded",
            filtered_artifact.total_after_filtering, filtered_artifact.total_discarded
        ))
    );

    // Stage 3: self-verify
    let verifier = SelfVerifier::new(oracle.clone(), images.clone(), config.verifier.clone());
    let verified = verifier.verify(filtered.retained).await;
    let verified_artifact = VerifiedArtifact {
        document_id: document_id.clone(),
        total_extractions: verified.claims.len(),
        verification_stats: verified.stats,
        extractions: verified.claims,
    };
    save_artifact(
        &stage_output_path(&args.output_dir, &document_id, "verified"),
        &verified_artifact,
    )?;
    println!(
        "{}",
        formatter.success(&format!(
            "Verified: {} confirmed, {} corrected, {} flagged",
            verified_artifact.verification_stats.confirmed,
            verified_artifact.verification_stats.corrected,
            verified_artifact.verification_stats.flagged
        ))
    );

    // Stage 4: escalation review
    let mut reviewer_config = config.reviewer.clone();
    if let Some(threshold) = args.threshold {
        reviewer_config.confidence_threshold = threshold;
    }
    let reviewer = EscalationReviewer::new(oracle, images, reviewer_config);
    let reviewed = reviewer.review(verified_artifact.extractions.clone()).await;
    let reviewed_artifact = ReviewedArtifact {
        document_id: document_id.clone(),
        total_extractions: reviewed.claims.len(),
        review_stats: reviewed.stats,
        extractions: reviewed.claims,
    };
    save_artifact(
        &stage_output_path(&args.output_dir, &document_id, "reviewed"),
        &reviewed_artifact,
    )?;

    let still_needs_review = reviewed_artifact
        .extractions
        .iter()
        .filter(|c| c.flags.needs_review)
        .count();

    println!(
        "{}",
        formatter.success(&format!(
            "Reviewed: {} escalated, {} still need a human",
            reviewed_artifact.review_stats.total_reviewed, still_needs_review
        ))
    );
    println!("{}", formatter.claims_table(&reviewed_artifact.extractions));

    Ok(())
}
