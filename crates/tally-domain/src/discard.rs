//! Discard records left behind by the validity filter

use crate::claim::ClaimId;
use serde::{Deserialize, Serialize};

/// Audit record for a claim the validity filter removed
///
/// Claims are never silently dropped: the one stage allowed to remove a
/// claim replaces it with this record so the discard stays attributable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardedClaim {
    /// Id of the removed claim
    pub id: ClaimId,

    /// KPI label of the removed claim
    pub kpi_name: String,

    /// Reason code from the filter chain, e.g. `low_confidence`
    pub reason: String,
}
