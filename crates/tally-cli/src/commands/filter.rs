//! The filter command: reject implausible claims.

use crate::cli::FilterArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tally_artifact::{load_artifact, save_artifact, stage_output_path, ClaimSetArtifact, FilteredArtifact};
use tally_domain::Statistics;
use tally_gatekeeper::Gatekeeper;

/// Execute the filter command.
pub fn execute_filter(args: FilterArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input: ClaimSetArtifact = load_artifact(&args.input)?;
    let document_id = input.document_id;
    let total_before = input.extractions.len();

    let gatekeeper = Gatekeeper::new(config.filter.clone());
    let outcome = gatekeeper.filter(input.extractions);
    let statistics = Statistics::from_claims(&outcome.retained);

    let total_discarded = outcome.discarded.len();
    let discard_rate = if total_before > 0 {
        (total_discarded as f64 / total_before as f64 * 1000.0).round() / 1000.0
    } else {
        0.0
    };

    let artifact = FilteredArtifact {
        document_id: document_id.clone(),
        total_before_filtering: total_before,
        total_after_filtering: outcome.retained.len(),
        total_discarded,
        discard_rate,
        extractions: outcome.retained,
        discarded: outcome.discarded,
        statistics,
    };

    let path = stage_output_path(&args.output_dir, &document_id, "filtered");
    save_artifact(&path, &artifact)?;

    println!(
        "{}",
        formatter.success(&format!("Filtered artifact saved: {}", path.display()))
    );
    println!(
        "{}",
        formatter.info(&format!("Valid KPIs: {}", artifact.total_after_filtering))
    );
    println!(
        "{}",
        formatter.info(&format!("Discard rate: {:.1}%", artifact.discard_rate * 100.0))
    );

    Ok(())
}
