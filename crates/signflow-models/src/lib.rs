//! # Signflow Models
//!
//! Domain models and DTOs for the Signflow role permission editor.
//!
//! # Modules
//!
//! - [`forms`]: Form-encoded submission codec (`permissions[i].*` groups)
//! - [`ids`]: Strongly-typed identifiers
//! - [`menus`]: Menu catalog nodes and catalog pages
//! - [`permissions`]: Capabilities, permission rows and persisted grants
//! - [`roles`]: Roles and the role submission
//!
//! # Example
//!
//! ```ignore
//! use signflow_models::{Capability, CapabilityFlags, MenuId, PermissionRow};
//!
//! let mut row = PermissionRow {
//!     menu_id: MenuId::new(10),
//!     parent_id: Some(MenuId::new(1)),
//!     group: None,
//!     title: "Cities".into(),
//!     flags: CapabilityFlags::default(),
//! };
//! row.flags.set(Capability::Read, true);
//! ```

pub mod forms;
pub mod ids;
pub mod menus;
pub mod permissions;
pub mod roles;

// Re-export commonly used types at crate root for convenience
pub use forms::{FromFormPairs, encode_permission_rows, encode_role_submission, with_role_id};
pub use ids::{GrantId, MenuId, RoleId};
pub use menus::{CatalogEntry, CatalogPage, CreateMenuDto, MenuNode};
pub use permissions::{Capability, CapabilityFlags, Grant, PermissionRow};
pub use roles::{ReconcileSummary, Role, RoleFields, RoleSubmission};
