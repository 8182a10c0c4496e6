//! Postgres-backed menu catalog.

use std::collections::HashSet;

use async_trait::async_trait;
use signflow_matrix::{CatalogError, CatalogRequest, MenuCatalog};
use signflow_models::{CapabilityFlags, CatalogEntry, CatalogPage, MenuId, MenuNode, RoleId};
use sqlx::{FromRow, PgPool};
use tracing::{error, instrument};

/// Walks each selected module and all of its descendants, modules in request
/// order, children depth-first by position. Grants are joined for item rows
/// only, and only the current grant of the role counts.
const CATALOG_QUERY: &str = r#"
    WITH RECURSIVE tree AS (
        SELECT m.id, m.parent_id, m.title, m.group_label, m.position,
               s.ord AS module_ord, ARRAY[]::BIGINT[] AS path
        FROM UNNEST($1::BIGINT[]) WITH ORDINALITY AS s(id, ord)
        JOIN menus m ON m.id = s.id AND m.parent_id IS NULL
        UNION ALL
        SELECT c.id, c.parent_id, c.title, c.group_label, c.position,
               t.module_ord, t.path || ARRAY[c.position::BIGINT, c.id]
        FROM menus c
        JOIN tree t ON c.parent_id = t.id
    )
    SELECT t.id AS menu_id, t.parent_id, t.title, t.group_label, t.position,
           COALESCE(g.can_create, FALSE) AS can_create,
           COALESCE(g.can_read, FALSE) AS can_read,
           COALESCE(g.can_update, FALSE) AS can_update,
           COALESCE(g.can_delete, FALSE) AS can_delete
    FROM tree t
    LEFT JOIN role_menu_grants g
        ON t.parent_id IS NOT NULL
       AND g.menu_id = t.id
       AND g.role_id = $2
       AND g.is_active
       AND g.deleted_at IS NULL
    ORDER BY t.module_ord, t.path
"#;

#[derive(Debug, FromRow)]
struct CatalogRow {
    menu_id: MenuId,
    parent_id: Option<MenuId>,
    title: String,
    group_label: Option<String>,
    position: i32,
    can_create: bool,
    can_read: bool,
    can_update: bool,
    can_delete: bool,
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        CatalogEntry {
            node: MenuNode {
                id: row.menu_id,
                parent_id: row.parent_id,
                title: row.title,
                group: row.group_label,
                position: row.position,
            },
            granted: CapabilityFlags {
                create: row.can_create,
                read: row.can_read,
                update: row.can_update,
                delete: row.can_delete,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgMenuCatalog {
    db: PgPool,
}

impl PgMenuCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        role_id: Option<RoleId>,
        module_ids: &[MenuId],
    ) -> Result<CatalogPage, CatalogError> {
        if module_ids.is_empty() {
            return Ok(CatalogPage::default());
        }

        let rows = sqlx::query_as::<_, CatalogRow>(CATALOG_QUERY)
            .bind(module_ids)
            .bind(role_id)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Menu catalog query failed");
                CatalogError::Unavailable(e.to_string())
            })?;

        let found: HashSet<MenuId> = rows
            .iter()
            .filter(|row| row.parent_id.is_none())
            .map(|row| row.menu_id)
            .collect();
        let missing: Vec<MenuId> = module_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::UnknownModule(missing));
        }

        Ok(CatalogPage::new(
            rows.into_iter().map(CatalogEntry::from).collect(),
        ))
    }
}

#[async_trait]
impl MenuCatalog for PgMenuCatalog {
    async fn fetch(&self, request: &CatalogRequest) -> Result<CatalogPage, CatalogError> {
        self.fetch_page(request.role_id, &request.module_ids).await
    }
}
