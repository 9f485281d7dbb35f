//! The consolidate command: deduplicate raw claims.

use crate::cli::ConsolidateArgs;
use crate::error::Result;
use crate::output::Formatter;
use tally_artifact::{load_artifact, save_artifact, stage_output_path, ConsolidatedArtifact, RawClaimsArtifact};
use tally_dedup::consolidate;
use tally_domain::Statistics;

/// Execute the consolidate command.
pub fn execute_consolidate(args: ConsolidateArgs, formatter: &Formatter) -> Result<()> {
    let raw: RawClaimsArtifact = load_artifact(&args.input)?;
    let document_id = raw.document_id;
    let total_raw = raw.extractions.len();

    let outcome = consolidate(raw.extractions);
    let statistics = Statistics::from_claims(&outcome.claims);

    let artifact = ConsolidatedArtifact {
        document_id: document_id.clone(),
        total_raw_extractions: total_raw,
        total_unique_extractions: outcome.claims.len(),
        extractions: outcome.claims,
        conflicts: outcome.conflicts,
        statistics,
    };

    let path = stage_output_path(&args.output_dir, &document_id, "consolidated");
    save_artifact(&path, &artifact)?;

    println!(
        "{}",
        formatter.success(&format!("Consolidated artifact saved: {}", path.display()))
    );
    println!(
        "{}",
        formatter.info(&format!("Unique KPIs: {}", artifact.total_unique_extractions))
    );
    println!(
        "{}",
        formatter.info(&format!("Conflicts: {}", artifact.conflicts.len()))
    );
    println!(
        "{}",
        formatter.info(&format!(
            "Avg confidence: {}",
            artifact.statistics.average_confidence
        ))
    );

    Ok(())
}
