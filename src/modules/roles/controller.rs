use axum::{
    Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use signflow_core::{AppError, ErrorResponse};
use signflow_matrix::MatrixView;
use signflow_models::{CatalogPage, RoleId, RoleSubmission, with_role_id};

use crate::state::AppState;
use crate::validator::ValidatedForm;

use super::model::{CatalogQuery, MatrixQuery, PreviewRequest, SaveNotice};
use super::service;

#[utoipa::path(
    get,
    path = "/api/roles/catalog",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Menu nodes under the selected modules", body = CatalogPage),
        (status = 422, description = "A requested id is not a module", body = ErrorResponse),
        (status = 500, description = "Catalog unavailable", body = ErrorResponse)
    ),
    tag = "Roles"
)]
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogPage>, AppError> {
    let page = service::fetch_catalog(&state.db, query.role_id, query.module_ids).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/roles/matrix",
    params(MatrixQuery),
    responses(
        (status = 200, description = "Empty permission matrix for a new role", body = MatrixView)
    ),
    tag = "Roles"
)]
pub async fn get_new_role_matrix(
    State(state): State<AppState>,
    Query(query): Query<MatrixQuery>,
) -> Result<Json<MatrixView>, AppError> {
    let view = service::build_matrix(&state.db, None, query.module_ids).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}/matrix",
    params(
        ("id" = i64, Path, description = "Role ID"),
        MatrixQuery
    ),
    responses(
        (status = 200, description = "Permission matrix of the role", body = MatrixView),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    tag = "Roles"
)]
pub async fn get_role_matrix(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    Query(query): Query<MatrixQuery>,
) -> Result<Json<MatrixView>, AppError> {
    let view = service::build_matrix(&state.db, Some(id), query.module_ids).await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/roles/matrix/preview",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Matrix after the edit settled", body = MatrixView)
    ),
    tag = "Roles"
)]
pub async fn preview_matrix(Json(request): Json<PreviewRequest>) -> Json<MatrixView> {
    Json(service::preview_matrix(request))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body(content = RoleSubmission, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Role created; redirects to the role list"),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Save failed", body = ErrorResponse)
    ),
    tag = "Roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedForm(submission): ValidatedForm<RoleSubmission>,
) -> Result<Redirect, AppError> {
    service::save_role(&state.db, with_role_id(submission, None)).await?;
    Ok(Redirect::to(&SaveNotice::RoleCreated.redirect_target()))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}",
    params(
        ("id" = i64, Path, description = "Role ID")
    ),
    request_body(content = RoleSubmission, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Role updated; redirects to the role list"),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Save failed", body = ErrorResponse)
    ),
    tag = "Roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<RoleId>,
    ValidatedForm(submission): ValidatedForm<RoleSubmission>,
) -> Result<Redirect, AppError> {
    service::save_role(&state.db, with_role_id(submission, Some(id))).await?;
    Ok(Redirect::to(&SaveNotice::RoleUpdated.redirect_target()))
}
