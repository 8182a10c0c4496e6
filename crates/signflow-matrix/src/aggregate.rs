//! Tri-state capability aggregates and the master toggle.
//!
//! Aggregates are never stored on their own; they are derived from how many
//! editable rows have a capability set. [`MatrixEditor`](crate::MatrixEditor)
//! keeps those counts incrementally, while [`aggregate_by_scan`] recomputes
//! them from scratch and serves as the reference definition.

use serde::{Deserialize, Serialize};
use signflow_models::{Capability, PermissionRow};
use utoipa::ToSchema;

/// Summary of one capability across every editable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    /// Every editable row has the capability.
    All,
    /// No editable row has the capability (also reported for an empty set).
    None,
    /// Some, but not all, editable rows have the capability.
    Mixed,
}

impl TriState {
    /// Derives the state from `granted` out of `total` editable rows.
    pub const fn from_counts(granted: usize, total: usize) -> Self {
        if granted == 0 {
            TriState::None
        } else if granted == total {
            TriState::All
        } else {
            TriState::Mixed
        }
    }

    pub const fn is_all(self) -> bool {
        matches!(self, TriState::All)
    }
}

/// Aggregate of `capability` computed by walking every row.
pub fn aggregate_by_scan(rows: &[PermissionRow], capability: Capability) -> TriState {
    let (granted, total) = rows
        .iter()
        .filter(|row| row.is_editable())
        .fold((0, 0), |(granted, total), row| {
            (granted + usize::from(row.flags.get(capability)), total + 1)
        });
    TriState::from_counts(granted, total)
}

/// The master toggle is on only when every capability is fully granted.
pub fn master_from(aggregates: &[TriState; 4]) -> bool {
    aggregates.iter().all(|state| state.is_all())
}
