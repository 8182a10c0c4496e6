use anyhow::anyhow;
use signflow_core::AppError;
use signflow_db::PgMenuCatalog;
use signflow_matrix::{CatalogError, MatrixEditor, MatrixView};
use signflow_models::{
    CatalogPage, Grant, MenuId, PermissionRow, ReconcileSummary, Role, RoleFields, RoleId,
    RoleSubmission,
};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, instrument, warn};

use crate::metrics;

use super::model::PreviewRequest;

const ROLE_COLUMNS: &str = "id, code, name, is_active, created_at, updated_at";

const GRANT_COLUMNS: &str = "id, role_id, menu_id, can_create, can_read, can_update, can_delete, \
                             is_active, deleted_at, created_at, updated_at";

fn catalog_result_label(err: &CatalogError) -> &'static str {
    match err {
        CatalogError::UnknownModule(_) => "unknown_module",
        CatalogError::Unavailable(_) => "unavailable",
    }
}

#[instrument(skip(db))]
pub async fn get_role(db: &PgPool, id: RoleId) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>(&format!("SELECT {} FROM roles WHERE id = $1", ROLE_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))
}

/// Raw catalog page for the module selector.
#[instrument(skip(db))]
pub async fn fetch_catalog(
    db: &PgPool,
    role_id: Option<RoleId>,
    module_ids: Vec<MenuId>,
) -> Result<CatalogPage, AppError> {
    let catalog = PgMenuCatalog::new(db.clone());
    let request = signflow_matrix::CatalogRequest::new(role_id, module_ids);

    match catalog.fetch_page(request.role_id, &request.module_ids).await {
        Ok(page) => {
            metrics::track_catalog_load("ok");
            Ok(page)
        }
        Err(err) => {
            metrics::track_catalog_load(catalog_result_label(&err));
            match err {
                CatalogError::UnknownModule(_) => {
                    Err(AppError::field("module_ids", err.to_string()))
                }
                CatalogError::Unavailable(_) => Err(AppError::internal(err)),
            }
        }
    }
}

/// Builds the editor for a new (`role_id = None`) or existing role.
///
/// A failed catalog load is not an error here: the view carries the message
/// and whatever rows the editor holds (none, for a fresh editor).
#[instrument(skip(db))]
pub async fn build_matrix(
    db: &PgPool,
    role_id: Option<RoleId>,
    module_ids: Vec<MenuId>,
) -> Result<MatrixView, AppError> {
    if let Some(id) = role_id {
        get_role(db, id).await?;
    }

    let catalog = PgMenuCatalog::new(db.clone());
    let mut editor = MatrixEditor::new(role_id);

    match editor.load_catalog(&catalog, module_ids).await {
        Ok(_) => metrics::track_catalog_load("ok"),
        Err(err) => {
            warn!(error = %err, "Rendering matrix without catalog rows");
            metrics::track_catalog_load(catalog_result_label(&err));
        }
    }

    Ok(MatrixView::from_editor(&editor))
}

/// Applies one edit to a client-held state and renders the settled matrix.
#[instrument(skip(request), fields(edit = ?request.edit))]
pub fn preview_matrix(request: PreviewRequest) -> MatrixView {
    let mut editor = MatrixEditor::from(request.state);
    let report = editor.apply(request.edit);
    debug!(
        event = ?report.event,
        rows_changed = report.rows_changed,
        aggregates_recomputed = report.aggregates_recomputed,
        "Matrix edit settled"
    );
    MatrixView::from_editor(&editor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrantChange {
    Created,
    Updated,
    Unchanged,
}

/// Saves the role and reconciles its grants in one transaction.
///
/// Only grants whose flags differ are written. Grants of menus absent from
/// the submission are left as they are.
#[instrument(skip(db, submission), fields(role_id = ?submission.role.id, rows = submission.permissions.len()))]
pub async fn save_role(
    db: &PgPool,
    submission: RoleSubmission,
) -> Result<ReconcileSummary, AppError> {
    let mut tx = db.begin().await?;

    let role = match submission.role.id {
        Some(id) => update_role(&mut *tx, id, &submission.role).await?,
        None => insert_role(&mut *tx, &submission.role).await?,
    };

    let mut summary = ReconcileSummary {
        role,
        created: 0,
        updated: 0,
        unchanged: 0,
    };

    for row in submission.permissions.iter().filter(|row| row.is_editable()) {
        match reconcile_grant(&mut *tx, summary.role.id, row).await? {
            GrantChange::Created => summary.created += 1,
            GrantChange::Updated => summary.updated += 1,
            GrantChange::Unchanged => summary.unchanged += 1,
        }
    }

    tx.commit().await?;

    metrics::track_role_saved(submission.role.id.is_none());
    metrics::track_grants_reconciled(summary.created, summary.updated, summary.unchanged);
    info!(
        role_id = %summary.role.id,
        created = summary.created,
        updated = summary.updated,
        unchanged = summary.unchanged,
        "Role saved"
    );

    Ok(summary)
}

fn map_role_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::field("code", "Code has already been taken");
    }
    AppError::from(e)
}

async fn insert_role(conn: &mut PgConnection, fields: &RoleFields) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>(&format!(
        "INSERT INTO roles (code, name, is_active) VALUES ($1, $2, $3) RETURNING {}",
        ROLE_COLUMNS
    ))
    .bind(&fields.code)
    .bind(&fields.name)
    .bind(fields.is_active)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_role_write_error)
}

async fn update_role(
    conn: &mut PgConnection,
    id: RoleId,
    fields: &RoleFields,
) -> Result<Role, AppError> {
    sqlx::query_as::<_, Role>(&format!(
        "UPDATE roles SET code = $2, name = $3, is_active = $4, updated_at = NOW()
         WHERE id = $1 RETURNING {}",
        ROLE_COLUMNS
    ))
    .bind(id)
    .bind(&fields.code)
    .bind(&fields.name)
    .bind(fields.is_active)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_role_write_error)?
    .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))
}

async fn reconcile_grant(
    conn: &mut PgConnection,
    role_id: RoleId,
    row: &PermissionRow,
) -> Result<GrantChange, AppError> {
    let current = sqlx::query_as::<_, Grant>(&format!(
        "SELECT {} FROM role_menu_grants
         WHERE role_id = $1 AND menu_id = $2 AND is_active AND deleted_at IS NULL
         FOR UPDATE",
        GRANT_COLUMNS
    ))
    .bind(role_id)
    .bind(row.menu_id)
    .fetch_optional(&mut *conn)
    .await?;

    match current {
        Some(grant) if grant.flags() == row.flags => Ok(GrantChange::Unchanged),
        Some(grant) => {
            sqlx::query(
                "UPDATE role_menu_grants
                 SET can_create = $2, can_read = $3, can_update = $4, can_delete = $5,
                     updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(grant.id)
            .bind(row.flags.create)
            .bind(row.flags.read)
            .bind(row.flags.update)
            .bind(row.flags.delete)
            .execute(&mut *conn)
            .await?;
            Ok(GrantChange::Updated)
        }
        None => {
            // Earlier rows for the pair that are not current (inactive but never
            // deleted) are retired before the new grant is created.
            sqlx::query(
                "UPDATE role_menu_grants
                 SET is_active = FALSE, deleted_at = NOW(), updated_at = NOW()
                 WHERE role_id = $1 AND menu_id = $2 AND deleted_at IS NULL",
            )
            .bind(role_id)
            .bind(row.menu_id)
            .execute(&mut *conn)
            .await?;

            sqlx::query(
                "INSERT INTO role_menu_grants
                     (role_id, menu_id, can_create, can_read, can_update, can_delete, is_active)
                 VALUES ($1, $2, $3, $4, $5, $6, TRUE)",
            )
            .bind(role_id)
            .bind(row.menu_id)
            .bind(row.flags.create)
            .bind(row.flags.read)
            .bind(row.flags.update)
            .bind(row.flags.delete)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::field(
                        "permissions",
                        format!("Unknown menu id {}", row.menu_id),
                    );
                }
                AppError::from(e)
            })?;
            Ok(GrantChange::Created)
        }
    }
}
