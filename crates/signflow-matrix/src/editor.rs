//! The permission matrix editor.
//!
//! The row set is the only authoritative store. For each capability the
//! editor keeps the number of editable rows that have it set, which makes the
//! four aggregates and the master toggle derived reads. Aggregate and master
//! edits are cascades of row writes, so a derived value is never written back
//! and no edit can trigger another.
//!
//! # Example
//!
//! ```ignore
//! use signflow_matrix::{MatrixEditor, TriState};
//! use signflow_models::Capability;
//!
//! let mut editor = MatrixEditor::new(Some(role_id));
//! editor.load_catalog(&catalog, vec![module_id]).await?;
//!
//! editor.set_row(1, Capability::Read, true);
//! assert_eq!(editor.aggregate(Capability::Read), TriState::Mixed);
//!
//! editor.set_master(true);
//! let rows = editor.snapshot();
//! ```

use serde::{Deserialize, Serialize};
use signflow_models::{Capability, CatalogPage, MenuId, PermissionRow, RoleId};
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;

use crate::aggregate::{TriState, master_from};
use crate::catalog::{CatalogError, CatalogRequest, MenuCatalog};

/// What the editor is doing. Every public operation enters one of the edit
/// states and returns to [`SyncState::Idle`] before it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    RowEdited,
    AggregateEdited,
    MasterEdited,
    CatalogReloaded,
}

/// Outcome of one settle pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettleReport {
    /// The edit that was settled.
    pub event: SyncState,
    /// Capability cells that actually changed value.
    pub rows_changed: usize,
    /// Aggregates rederived by this pass (at most four).
    pub aggregates_recomputed: usize,
}

impl SettleReport {
    const fn unchanged(event: SyncState) -> Self {
        Self {
            event,
            rows_changed: 0,
            aggregates_recomputed: 0,
        }
    }
}

/// An edit coming from one of the three representations of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixEdit {
    /// A single checkbox in a row.
    Row {
        index: usize,
        capability: Capability,
        value: bool,
    },
    /// A capability's "select all" checkbox.
    Aggregate { capability: Capability, value: bool },
    /// The "all privileges" checkbox.
    Master { value: bool },
}

/// Handle for a catalog load in flight.
///
/// Only the most recently issued ticket may replace the row set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    sequence: u64,
    request: CatalogRequest,
}

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &CatalogRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page replaced the row set.
    Applied(SettleReport),
    /// A newer load was issued after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct MatrixEditor {
    role_id: Option<RoleId>,
    modules: Vec<MenuId>,
    rows: Vec<PermissionRow>,
    /// Number of rows with a parent.
    editable: usize,
    /// Per capability, editable rows that have it set.
    granted: [usize; 4],
    state: SyncState,
    issued: u64,
    fetch_error: Option<CatalogError>,
}

impl MatrixEditor {
    /// An empty editor for `role_id` (`None` while creating a role).
    pub fn new(role_id: Option<RoleId>) -> Self {
        Self {
            role_id,
            modules: Vec::new(),
            rows: Vec::new(),
            editable: 0,
            granted: [0; 4],
            state: SyncState::Idle,
            issued: 0,
            fetch_error: None,
        }
    }

    /// Rebuilds an editor from a previously rendered row set.
    ///
    /// Flags on module rows are cleared since modules never carry capability
    /// state.
    pub fn with_rows(
        role_id: Option<RoleId>,
        modules: Vec<MenuId>,
        rows: Vec<PermissionRow>,
    ) -> Self {
        let mut editor = Self::new(role_id);
        editor.modules = modules;
        editor.replace_rows(rows);
        editor
    }

    pub fn role_id(&self) -> Option<RoleId> {
        self.role_id
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn rows(&self) -> &[PermissionRow] {
        &self.rows
    }

    /// The current row set, ready for submission.
    pub fn snapshot(&self) -> Vec<PermissionRow> {
        self.rows.clone()
    }

    pub fn selected_modules(&self) -> &[MenuId] {
        &self.modules
    }

    /// Error of the last catalog load, cleared by the next successful one.
    pub fn fetch_error(&self) -> Option<&CatalogError> {
        self.fetch_error.as_ref()
    }

    pub fn editable_rows(&self) -> usize {
        self.editable
    }

    pub fn aggregate(&self, capability: Capability) -> TriState {
        TriState::from_counts(self.granted[capability.index()], self.editable)
    }

    /// Aggregates in [`Capability::ALL`] order.
    pub fn aggregates(&self) -> [TriState; 4] {
        Capability::ALL.map(|capability| self.aggregate(capability))
    }

    pub fn master(&self) -> bool {
        master_from(&self.aggregates())
    }

    /// Starts a catalog load for `module_ids`.
    ///
    /// Issuing a ticket makes every earlier ticket stale. Edits made while the
    /// load is pending are legal but are replaced when it completes.
    pub fn begin_load(&mut self, module_ids: impl IntoIterator<Item = MenuId>) -> LoadTicket {
        self.issued += 1;
        LoadTicket {
            sequence: self.issued,
            request: CatalogRequest::new(self.role_id, module_ids),
        }
    }

    /// Completes a load started with [`begin_load`](Self::begin_load).
    ///
    /// A failed load leaves the row set untouched and records the error for
    /// the view.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<CatalogPage, CatalogError>,
    ) -> Result<LoadOutcome, CatalogError> {
        if ticket.sequence != self.issued {
            debug!(
                sequence = ticket.sequence,
                latest = self.issued,
                "Dropping stale catalog load"
            );
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(page) => {
                self.state = SyncState::CatalogReloaded;
                self.modules = ticket.request.module_ids;
                self.fetch_error = None;
                let report = self.replace_rows(page.rows());
                self.state = SyncState::Idle;
                Ok(LoadOutcome::Applied(report))
            }
            Err(err) => {
                warn!(error = %err, "Catalog load failed; keeping current rows");
                self.fetch_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Fetches the catalog for `module_ids` and replaces the row set.
    #[instrument(skip(self, catalog), fields(role_id = ?self.role_id))]
    pub async fn load_catalog(
        &mut self,
        catalog: &dyn MenuCatalog,
        module_ids: Vec<MenuId>,
    ) -> Result<LoadOutcome, CatalogError> {
        let ticket = self.begin_load(module_ids);
        let result = if ticket.request.is_empty() {
            Ok(CatalogPage::default())
        } else {
            catalog.fetch(&ticket.request).await
        };
        self.finish_load(ticket, result)
    }

    /// Sets one checkbox. Module rows and unknown indices are ignored.
    pub fn set_row(&mut self, index: usize, capability: Capability, value: bool) -> SettleReport {
        self.state = SyncState::RowEdited;

        let report = match self.rows.get_mut(index) {
            Some(row) if row.is_editable() && row.flags.get(capability) != value => {
                row.flags.set(capability, value);
                let count = &mut self.granted[capability.index()];
                if value {
                    *count += 1;
                } else {
                    *count -= 1;
                }
                SettleReport {
                    event: SyncState::RowEdited,
                    rows_changed: 1,
                    aggregates_recomputed: 1,
                }
            }
            _ => SettleReport::unchanged(SyncState::RowEdited),
        };

        self.state = SyncState::Idle;
        report
    }

    /// Sets `capability` on every editable row.
    pub fn set_aggregate(&mut self, capability: Capability, value: bool) -> SettleReport {
        self.state = SyncState::AggregateEdited;
        let rows_changed = self.cascade(capability, value);
        self.state = SyncState::Idle;

        SettleReport {
            event: SyncState::AggregateEdited,
            rows_changed,
            aggregates_recomputed: 1,
        }
    }

    /// Sets every capability on every editable row.
    pub fn set_master(&mut self, value: bool) -> SettleReport {
        self.state = SyncState::MasterEdited;
        let rows_changed: usize = Capability::ALL
            .into_iter()
            .map(|capability| self.cascade(capability, value))
            .sum();
        self.state = SyncState::Idle;

        SettleReport {
            event: SyncState::MasterEdited,
            rows_changed,
            aggregates_recomputed: Capability::ALL.len(),
        }
    }

    pub fn apply(&mut self, edit: MatrixEdit) -> SettleReport {
        match edit {
            MatrixEdit::Row {
                index,
                capability,
                value,
            } => self.set_row(index, capability, value),
            MatrixEdit::Aggregate { capability, value } => self.set_aggregate(capability, value),
            MatrixEdit::Master { value } => self.set_master(value),
        }
    }

    fn cascade(&mut self, capability: Capability, value: bool) -> usize {
        let mut changed = 0;
        for row in self.rows.iter_mut().filter(|row| row.is_editable()) {
            if row.flags.get(capability) != value {
                row.flags.set(capability, value);
                changed += 1;
            }
        }
        self.granted[capability.index()] = if value { self.editable } else { 0 };
        changed
    }

    fn replace_rows(&mut self, mut rows: Vec<PermissionRow>) -> SettleReport {
        let mut editable = 0;
        let mut granted = [0; 4];
        for row in &mut rows {
            if row.is_module() {
                row.flags = Default::default();
                continue;
            }
            editable += 1;
            for capability in Capability::ALL {
                granted[capability.index()] += usize::from(row.flags.get(capability));
            }
        }

        let rows_changed = rows.len();
        self.rows = rows;
        self.editable = editable;
        self.granted = granted;

        SettleReport {
            event: SyncState::CatalogReloaded,
            rows_changed,
            aggregates_recomputed: Capability::ALL.len(),
        }
    }
}

impl Default for MatrixEditor {
    fn default() -> Self {
        Self::new(None)
    }
}
