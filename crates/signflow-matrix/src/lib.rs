//! # Signflow Matrix
//!
//! The role permission matrix editor.
//!
//! A role is granted create/read/update/delete over a tree of menu items. The
//! grid is shown at three granularities: a checkbox per row and capability, a
//! tri-state "select all" per capability, and a master "all privileges"
//! toggle. [`MatrixEditor`] keeps the three consistent.
//!
//! - [`aggregate`]: Tri-state aggregates and master derivation
//! - [`catalog`]: The menu catalog provider contract
//! - [`editor`]: The editor itself and its load protocol
//! - [`view`]: Render model and round-trip state

pub mod aggregate;
pub mod catalog;
pub mod editor;
pub mod view;

pub use aggregate::{TriState, aggregate_by_scan, master_from};
pub use catalog::{CatalogError, CatalogRequest, MenuCatalog};
pub use editor::{LoadOutcome, LoadTicket, MatrixEdit, MatrixEditor, SettleReport, SyncState};
pub use view::{
    CapabilityToggle, CheckboxState, GroupSection, MatrixState, MatrixView, ModuleSection, RowView,
};
