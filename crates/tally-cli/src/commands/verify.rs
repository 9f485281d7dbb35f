//! The verify command: self-verification against page images.

use crate::cli::VerifyArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tally_artifact::{load_artifact, save_artifact, stage_output_path, ClaimSetArtifact, VerifiedArtifact};
use tally_oracle::PageImageStore;
use tally_verifier::SelfVerifier;

/// Execute the verify command.
pub async fn execute_verify(args: VerifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input: ClaimSetArtifact = load_artifact(&args.input)?;
    let document_id = input.document_id;

    let images = PageImageStore::from_manifest(&args.manifest)?;
    let oracle = config.oracle.build()?;
    let verifier = SelfVerifier::new(oracle, images, config.verifier.clone());

    let outcome = verifier.verify(input.extractions).await;

    for failure in &outcome.failures {
        println!(
            "{}",
            formatter.warn(&format!("Page {} not verified: {}", failure.page, failure.error))
        );
    }

    let artifact = VerifiedArtifact {
        document_id: document_id.clone(),
        total_extractions: outcome.claims.len(),
        verification_stats: outcome.stats,
        extractions: outcome.claims,
    };

    let path = stage_output_path(&args.output_dir, &document_id, "verified");
    save_artifact(&path, &artifact)?;

    println!(
        "{}",
        formatter.success(&format!("Verified artifact saved: {}", path.display()))
    );
    println!(
        "{}",
        formatter.info(&format!(
            "Confirmed: {}  Corrected: {}  Flagged: {}",
            artifact.verification_stats.confirmed,
            artifact.verification_stats.corrected,
            artifact.verification_stats.flagged
        ))
    );

    Ok(())
}
