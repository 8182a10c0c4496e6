//! Menu catalog models.
//!
//! The catalog is read-only tree data: modules (nodes without a parent) and
//! the menu items beneath them. Grant state is joined onto catalog nodes as a
//! separate overlay ([`CatalogEntry::granted`]) so re-fetching the catalog
//! never mixes the two.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::MenuId;
use crate::permissions::{CapabilityFlags, PermissionRow};

/// A node of the menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MenuNode {
    #[serde(rename = "menu_id")]
    pub id: MenuId,
    pub parent_id: Option<MenuId>,
    pub title: String,
    pub group: Option<String>,
    pub position: i32,
}

impl MenuNode {
    /// Top-level nodes scope which rows appear in the matrix.
    pub fn is_module(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A catalog node together with the capabilities already granted to the role
/// under edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub node: MenuNode,
    #[serde(flatten)]
    pub granted: CapabilityFlags,
}

impl CatalogEntry {
    /// Builds the editable row for this entry. Module rows never carry flags.
    pub fn to_row(&self) -> PermissionRow {
        let flags = if self.node.is_module() {
            CapabilityFlags::default()
        } else {
            self.granted
        };

        PermissionRow {
            menu_id: self.node.id,
            parent_id: self.node.parent_id,
            group: self.node.group.clone(),
            title: self.node.title.clone(),
            flags,
        }
    }
}

/// Response of a catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogPage {
    pub data: Vec<CatalogEntry>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

impl CatalogPage {
    pub fn new(data: Vec<CatalogEntry>) -> Self {
        let total_count = data.len() as i64;
        Self { data, total_count }
    }

    pub fn rows(&self) -> Vec<PermissionRow> {
        self.data.iter().map(CatalogEntry::to_row).collect()
    }
}

/// Input for inserting a catalog node (used by the seeder).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMenuDto {
    pub parent_id: Option<MenuId>,
    #[validate(length(
        min = 1,
        max = 150,
        message = "Title must be between 1 and 150 characters"
    ))]
    pub title: String,
    #[validate(length(max = 100, message = "Group must not exceed 100 characters"))]
    pub group: Option<String>,
    pub position: i32,
}
