use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_role, get_catalog, get_new_role_matrix, get_role_matrix, preview_matrix, update_role,
};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role))
        .route("/catalog", get(get_catalog))
        // Matrix editor
        .route("/matrix", get(get_new_role_matrix))
        .route("/matrix/preview", post(preview_matrix))
        .route("/{id}", post(update_role))
        .route("/{id}/matrix", get(get_role_matrix))
}
