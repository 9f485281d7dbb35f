//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tally_domain::Claim;

/// Console message and table formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("  {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warn(&self, message: &str) -> String {
        self.colorize(&format!("! {}", message), "yellow")
    }

    /// Render a claim set as a summary table.
    pub fn claims_table(&self, claims: &[Claim]) -> String {
        if claims.is_empty() {
            return self.colorize("No claims survived the pipeline.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "KPI", "FY", "Value", "Unit", "Conf", "Status", "Tier"]);

        for claim in claims {
            let id = claim.id.to_string();
            builder.push_record([
                &id[..8],
                &claim.kpi_name,
                &claim.fiscal_year.to_string(),
                &claim.display_value(),
                &claim.unit,
                &format!("{:.2}", claim.confidence),
                claim.verification_status.as_str(),
                claim.review_tier.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "yellow" => text.yellow().to_string(),
            "blue" => text.blue().to_string(),
            _ => text.to_string(),
        }
    }
}
