//! The review command: escalate residual uncertainty.

use crate::cli::ReviewArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tally_artifact::{load_artifact, save_artifact, stage_output_path, ClaimSetArtifact, ReviewedArtifact};
use tally_oracle::PageImageStore;
use tally_reviewer::EscalationReviewer;

/// Execute the review command.
pub async fn execute_review(args: ReviewArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input: ClaimSetArtifact = load_artifact(&args.input)?;
    let document_id = input.document_id;

    let mut reviewer_config = config.reviewer.clone();
    if let Some(threshold) = args.threshold {
        reviewer_config.confidence_threshold = threshold;
    }

    let images = PageImageStore::from_manifest(&args.manifest)?;
    let oracle = config.oracle.build()?;
    let reviewer = EscalationReviewer::new(oracle, images, reviewer_config);

    let outcome = reviewer.review(input.extractions).await;

    for failure in &outcome.failures {
        println!(
            "{}",
            formatter.warn(&format!(
                "{} ({}) not reviewed: {}",
                failure.kpi_name, failure.id, failure.error
            ))
        );
    }

    let artifact = ReviewedArtifact {
        document_id: document_id.clone(),
        total_extractions: outcome.claims.len(),
        review_stats: outcome.stats,
        extractions: outcome.claims,
    };

    let path = stage_output_path(&args.output_dir, &document_id, "reviewed");
    save_artifact(&path, &artifact)?;

    println!(
        "{}",
        formatter.success(&format!("Reviewed artifact saved: {}", path.display()))
    );
    println!(
        "{}",
        formatter.info(&format!(
            "Reviewed: {}  Confirmed: {}  Corrected: {}  Still ambiguous: {}",
            artifact.review_stats.total_reviewed,
            artifact.review_stats.confirmed,
            artifact.review_stats.corrected,
            artifact.review_stats.still_ambiguous
        ))
    );

    Ok(())
}
