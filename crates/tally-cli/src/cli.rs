//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tally - reconcile noisy KPI claims into one trustworthy dataset.
#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ~/.tally/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands, one per pipeline stage plus `run`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deduplicate raw claims by (KPI, fiscal year)
    Consolidate(ConsolidateArgs),

    /// Remove implausible claims with the validity rule chain
    Filter(FilterArgs),

    /// Re-check claims against their page images with the verification oracle
    Verify(VerifyArgs),

    /// Escalate residual uncertainty to the review oracle
    Review(ReviewArgs),

    /// Run all four stages back to back
    Run(RunArgs),
}

/// Arguments for the consolidate command.
#[derive(Debug, Parser)]
pub struct ConsolidateArgs {
    /// Raw claims artifact from the extraction layer
    pub input: PathBuf,

    /// Directory for the consolidated artifact
    #[arg(long, default_value = "output/consolidated")]
    pub output_dir: PathBuf,
}

/// Arguments for the filter command.
#[derive(Debug, Parser)]
pub struct FilterArgs {
    /// Consolidated artifact to filter
    pub input: PathBuf,

    /// Directory for the filtered artifact
    #[arg(long, default_value = "output/filtered")]
    pub output_dir: PathBuf,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Filtered artifact to verify
    pub input: PathBuf,

    /// Page-image manifest from the rendering step
    pub manifest: PathBuf,

    /// Directory for the verified artifact
    #[arg(long, default_value = "output/verified")]
    pub output_dir: PathBuf,
}

/// Arguments for the review command.
#[derive(Debug, Parser)]
pub struct ReviewArgs {
    /// Verified artifact to review
    pub input: PathBuf,

    /// Page-image manifest from the rendering step
    pub manifest: PathBuf,

    /// Directory for the reviewed artifact
    #[arg(long, default_value = "output/reviewed")]
    pub output_dir: PathBuf,

    /// Confidence threshold below which claims are escalated
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Raw claims artifact from the extraction layer
    pub input: PathBuf,

    /// Page-image manifest from the rendering step
    pub manifest: PathBuf,

    /// Base directory for all stage artifacts
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Confidence threshold below which claims are escalated
    #[arg(short, long)]
    pub threshold: Option<f64>,
}
