#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use signflow::router::init_router;
use signflow::signflow_config::CorsConfig;
use signflow::state::AppState;
use signflow_models::{
    CapabilityFlags, Grant, GrantId, MenuId, PermissionRow, RoleFields, RoleId, RoleSubmission,
};
use sqlx::PgPool;
use tower::ServiceExt;

const GRANT_COLUMNS: &str = "id, role_id, menu_id, can_create, can_read, can_update, can_delete, \
                             is_active, deleted_at, created_at, updated_at";

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    init_router(AppState::new(pool, CorsConfig::default()))
}

pub async fn create_role(pool: &PgPool, code: &str) -> RoleId {
    sqlx::query_scalar::<_, RoleId>(
        "INSERT INTO roles (code, name, is_active) VALUES ($1, $2, TRUE) RETURNING id",
    )
    .bind(code)
    .bind(format!("Role {}", code))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_menu(
    pool: &PgPool,
    parent_id: Option<MenuId>,
    title: &str,
    group: Option<&str>,
    position: i32,
) -> MenuId {
    sqlx::query_scalar::<_, MenuId>(
        "INSERT INTO menus (parent_id, title, group_label, position)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(parent_id)
    .bind(title)
    .bind(group)
    .bind(position)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Two modules: "Master Data" (Cities, Provinces under "Regions") and
/// "Documents" (Upload under "Workflow").
pub struct Catalog {
    pub master_data: MenuId,
    pub cities: MenuId,
    pub provinces: MenuId,
    pub documents: MenuId,
    pub upload: MenuId,
}

pub async fn seed_catalog(pool: &PgPool) -> Catalog {
    let master_data = create_menu(pool, None, "Master Data", None, 0).await;
    // Inserted out of order; position decides.
    let provinces = create_menu(pool, Some(master_data), "Provinces", Some("Regions"), 1).await;
    let cities = create_menu(pool, Some(master_data), "Cities", Some("Regions"), 0).await;
    let documents = create_menu(pool, None, "Documents", None, 1).await;
    let upload = create_menu(pool, Some(documents), "Upload", Some("Workflow"), 0).await;

    Catalog {
        master_data,
        cities,
        provinces,
        documents,
        upload,
    }
}

pub async fn insert_grant(
    pool: &PgPool,
    role_id: RoleId,
    menu_id: MenuId,
    flags: CapabilityFlags,
    is_active: bool,
) -> GrantId {
    sqlx::query_scalar::<_, GrantId>(
        "INSERT INTO role_menu_grants
             (role_id, menu_id, can_create, can_read, can_update, can_delete, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(role_id)
    .bind(menu_id)
    .bind(flags.create)
    .bind(flags.read)
    .bind(flags.update)
    .bind(flags.delete)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Every grant row of the pair, deleted ones included, oldest first.
pub async fn grant_rows(pool: &PgPool, role_id: RoleId, menu_id: MenuId) -> Vec<Grant> {
    sqlx::query_as::<_, Grant>(&format!(
        "SELECT {} FROM role_menu_grants WHERE role_id = $1 AND menu_id = $2 ORDER BY id",
        GRANT_COLUMNS
    ))
    .bind(role_id)
    .bind(menu_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

/// The current grant of the pair, if any.
pub async fn current_grant(pool: &PgPool, role_id: RoleId, menu_id: MenuId) -> Option<Grant> {
    let mut current: Vec<Grant> = grant_rows(pool, role_id, menu_id)
        .await
        .into_iter()
        .filter(Grant::is_current)
        .collect();
    assert!(current.len() <= 1, "more than one current grant");
    current.pop()
}

pub fn item_row(menu_id: MenuId, parent_id: MenuId, flags: CapabilityFlags) -> PermissionRow {
    PermissionRow {
        menu_id,
        parent_id: Some(parent_id),
        group: None,
        title: String::new(),
        flags,
    }
}

pub fn flags(create: bool, read: bool, update: bool, delete: bool) -> CapabilityFlags {
    CapabilityFlags {
        create,
        read,
        update,
        delete,
    }
}

pub fn submission(
    id: Option<RoleId>,
    code: &str,
    module_ids: Vec<MenuId>,
    permissions: Vec<PermissionRow>,
) -> RoleSubmission {
    RoleSubmission {
        role: RoleFields {
            id,
            code: code.to_string(),
            name: format!("Role {}", code),
            is_active: true,
        },
        module_ids,
        permissions,
    }
}

fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

/// `application/x-www-form-urlencoded` body from key/value pairs.
pub fn form_body(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: serde_json::Value,
}

async fn send(app: axum::Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        location,
        body,
    }
}

pub async fn get(app: axum::Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: axum::Router, uri: &str, body: serde_json::Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: axum::Router, uri: &str, pairs: &[(String, String)]) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form_body(pairs)))
        .unwrap();
    send(app, request).await
}
