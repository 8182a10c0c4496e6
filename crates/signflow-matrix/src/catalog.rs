//! Menu catalog provider contract.
//!
//! The editor never talks to a database itself; it asks a [`MenuCatalog`] for
//! the flattened menu tree under the selected modules, with the grants of the
//! role under edit already joined on.
//!
//! # Example
//!
//! ```ignore
//! use signflow_matrix::{CatalogRequest, MenuCatalog};
//!
//! let request = CatalogRequest::new(Some(role_id), vec![module_a, module_b]);
//! let page = catalog.fetch(&request).await?;
//! println!("{} rows", page.total_count);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use signflow_models::{CatalogPage, MenuId, RoleId};
use thiserror::Error;

/// Source of menu catalog pages.
///
/// Implementations can be swapped without changing the editor.
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Fetch every node under `request.module_ids`, modules first, in
    /// request order. An empty module list must yield an empty page.
    async fn fetch(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError>;
}

/// Parameters of one catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    /// Role whose grants are joined on; `None` for a role being created.
    pub role_id: Option<RoleId>,
    /// Selected modules, in display order, without duplicates.
    pub module_ids: Vec<MenuId>,
}

impl CatalogRequest {
    /// Builds a request, dropping repeated module ids while keeping the first
    /// occurrence's position.
    pub fn new(role_id: Option<RoleId>, module_ids: impl IntoIterator<Item = MenuId>) -> Self {
        let mut unique: Vec<MenuId> = Vec::new();
        for id in module_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            role_id,
            module_ids: unique,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.module_ids.is_empty()
    }
}

/// Why a catalog could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The provider could not be reached or failed mid-query.
    #[error("Menu catalog unavailable: {0}")]
    Unavailable(String),

    /// Some requested ids are not top-level modules.
    #[error("Unknown module(s): {}", join_ids(.0))]
    UnknownModule(Vec<MenuId>),
}

fn join_ids(ids: &[MenuId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
