//! KPI categories

use serde::{Deserialize, Serialize};

/// Category of a KPI claim
///
/// The set is closed; labels the extractor emits outside it map to
/// [`KpiCategory::Other`] rather than failing artifact deserialization.
/// Qualitative (null-value) claims are only legitimate for the
/// forward-looking and governance categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    /// Operating metrics: headcount, branches, capacity, volumes
    Operational,

    /// Financially derived ratios and per-unit figures
    Financial,

    /// Quantified disclosures (ESG, regulatory)
    Disclosure,

    /// Guidance and targets for future periods
    ForwardLooking,

    /// Board, audit, and ownership structure metrics
    Governance,

    /// Anything the extractor labeled outside the closed set
    #[serde(other)]
    Other,
}

impl KpiCategory {
    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiCategory::Operational => "operational",
            KpiCategory::Financial => "financial",
            KpiCategory::Disclosure => "disclosure",
            KpiCategory::ForwardLooking => "forward_looking",
            KpiCategory::Governance => "governance",
            KpiCategory::Other => "other",
        }
    }

    /// Parse a category from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "operational" => Some(KpiCategory::Operational),
            "financial" => Some(KpiCategory::Financial),
            "disclosure" => Some(KpiCategory::Disclosure),
            "forward_looking" => Some(KpiCategory::ForwardLooking),
            "governance" => Some(KpiCategory::Governance),
            _ => None,
        }
    }

    /// Whether claims in this category may carry a null numeric value
    pub fn allows_qualitative(&self) -> bool {
        matches!(self, KpiCategory::ForwardLooking | KpiCategory::Governance)
    }
}

impl Default for KpiCategory {
    fn default() -> Self {
        KpiCategory::Other
    }
}

impl std::str::FromStr for KpiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}
