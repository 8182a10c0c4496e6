mod common;

use axum::http::StatusCode;
use common::{
    create_role, current_grant, flags, get, insert_grant, item_row, post_form, post_json,
    seed_catalog, setup_test_app, submission,
};
use serde_json::json;
use signflow_models::{CapabilityFlags, encode_role_submission};
use sqlx::PgPool;

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalog_returns_page(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let role = create_role(&pool, "clerk").await;
    insert_grant(&pool, role, catalog.cities, flags(false, true, false, false), true).await;
    let app = setup_test_app(pool);

    let uri = format!(
        "/api/roles/catalog?module_ids={},{}&role_id={}",
        catalog.master_data, catalog.documents, role
    );
    let response = get(app, &uri).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalCount"], 5);
    let data = response.body["data"].as_array().unwrap();
    assert_eq!(data[0]["title"], "Master Data");
    assert_eq!(data[1]["title"], "Cities");
    assert_eq!(data[1]["read"], true);
    assert_eq!(data[1]["create"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalog_rejects_unknown_module(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let app = setup_test_app(pool);

    let response = get(app, &format!("/api/roles/catalog?module_ids={}", catalog.cities)).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["errors"]["module_ids"][0]
        .as_str()
        .unwrap()
        .starts_with("Unknown module"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_matrix_reflects_grants(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let role = create_role(&pool, "clerk").await;
    insert_grant(&pool, role, catalog.cities, CapabilityFlags::uniform(true), true).await;
    insert_grant(&pool, role, catalog.provinces, CapabilityFlags::uniform(true), true).await;
    let app = setup_test_app(pool);

    let response = get(
        app,
        &format!("/api/roles/{}/matrix?module_ids={}", role, catalog.master_data),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body["editable_rows"], 2);
    assert_eq!(body["master"]["checked"], true);
    assert_eq!(body["capabilities"][0]["state"], "all");
    assert_eq!(body["sections"][0]["title"], "Master Data");
    assert_eq!(body["sections"][0]["groups"][0]["label"], "Regions");
    assert_eq!(body["sections"][0]["groups"][0]["rows"][0]["index"], 1);
    assert!(body["fetch_error"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_matrix_for_unknown_role_is_not_found(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let app = setup_test_app(pool);

    let response = get(
        app,
        &format!("/api/roles/424242/matrix?module_ids={}", catalog.master_data),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Role not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_new_matrix_with_unknown_module_reports_fetch_error(pool: PgPool) {
    seed_catalog(&pool).await;
    let app = setup_test_app(pool);

    let response = get(app, "/api/roles/matrix?module_ids=987654").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["editable_rows"], 0);
    assert!(response.body["sections"].as_array().unwrap().is_empty());
    assert_eq!(response.body["fetch_error"], "Unknown module(s): 987654");
    assert_eq!(response.body["master"]["checked"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_preview_applies_aggregate_edit(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let app = setup_test_app(pool.clone());

    let matrix = get(
        app.clone(),
        &format!("/api/roles/matrix?module_ids={}", catalog.master_data),
    )
    .await;
    assert_eq!(matrix.status, StatusCode::OK);

    let response = post_json(
        app,
        "/api/roles/matrix/preview",
        json!({
            "state": matrix.body["state"],
            "edit": { "kind": "aggregate", "capability": "read", "value": true }
        }),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["capabilities"][1]["state"], "all");
    assert_eq!(response.body["capabilities"][0]["state"], "none");
    assert_eq!(response.body["master"]["checked"], false);
    let rows = response.body["state"]["rows"].as_array().unwrap();
    assert_eq!(rows[0]["read"], false, "module rows never carry flags");
    assert_eq!(rows[1]["read"], true);
    assert_eq!(rows[2]["read"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_role_redirects_and_persists_grants(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let app = setup_test_app(pool.clone());

    let form = encode_role_submission(&submission(
        None,
        "signer",
        vec![catalog.documents],
        vec![item_row(catalog.upload, catalog.documents, flags(true, true, false, false))],
    ));
    let response = post_form(app, "/api/roles", &form).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location.as_deref(),
        Some("/roles?notice=role_created")
    );

    let role = sqlx::query_scalar::<_, signflow_models::RoleId>(
        "SELECT id FROM roles WHERE code = 'signer'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let grant = current_grant(&pool, role, catalog.upload).await.unwrap();
    assert_eq!(grant.flags(), flags(true, true, false, false));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_role_uses_route_id(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let role = create_role(&pool, "clerk").await;
    let decoy = create_role(&pool, "decoy").await;
    let app = setup_test_app(pool.clone());

    let mut form = encode_role_submission(&submission(
        Some(decoy),
        "clerk",
        vec![catalog.master_data],
        vec![item_row(catalog.cities, catalog.master_data, flags(false, true, false, false))],
    ));
    form.push(pair("id", &decoy.to_string()));

    let response = post_form(app, &format!("/api/roles/{}", role), &form).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location.as_deref(),
        Some("/roles?notice=role_updated")
    );
    assert!(current_grant(&pool, role, catalog.cities).await.is_some());
    assert!(current_grant(&pool, decoy, catalog.cities).await.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_form_reports_field_errors(pool: PgPool) {
    let app = setup_test_app(pool);

    let form = vec![
        pair("code", "bad code!"),
        pair("name", "Bad"),
        pair("permissions[0].parent_id", "1"),
        pair("permissions[0].read", "on"),
    ];
    let response = post_form(app, "/api/roles", &form).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &response.body["errors"];
    assert_eq!(errors["permissions[0].menu_id"][0], "Menu is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_validation_errors_after_decoding(pool: PgPool) {
    let app = setup_test_app(pool);

    let form = vec![pair("code", "bad code!"), pair("name", "Bad")];
    let response = post_form(app, "/api/roles", &form).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &response.body["errors"];
    assert!(errors["code"].is_array());
    assert_eq!(errors["module_ids"][0], "Select at least one module");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_code_over_http(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    create_role(&pool, "finance").await;
    let app = setup_test_app(pool);

    let form = encode_role_submission(&submission(
        None,
        "finance",
        vec![catalog.master_data],
        vec![],
    ));
    let response = post_form(app, "/api/roles", &form).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"]["code"][0], "Code has already been taken");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_unknown_role_is_not_found(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let app = setup_test_app(pool);

    let form = encode_role_submission(&submission(
        None,
        "ghost",
        vec![catalog.master_data],
        vec![],
    ));
    let response = post_form(app, "/api/roles/424242", &form).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_form_requires_form_content_type(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = post_json(app, "/api/roles", json!({ "code": "x" })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
