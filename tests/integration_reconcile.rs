mod common;

use axum::http::StatusCode;
use common::{
    create_role, current_grant, flags, grant_rows, insert_grant, item_row, seed_catalog,
    submission,
};
use signflow::modules::roles::service::save_role;
use signflow_models::{CapabilityFlags, MenuId, PermissionRow, RoleId};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_updates_existing_grant_and_creates_missing(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let role = create_role(&pool, "clerk").await;
    let existing = insert_grant(&pool, role, catalog.cities, flags(false, true, false, false), true).await;

    let summary = save_role(
        &pool,
        submission(
            Some(role),
            "clerk",
            vec![catalog.master_data],
            vec![
                item_row(catalog.cities, catalog.master_data, flags(true, true, false, false)),
                item_row(catalog.provinces, catalog.master_data, flags(false, false, true, false)),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(summary.role.id, role);
    assert_eq!((summary.created, summary.updated, summary.unchanged), (1, 1, 0));

    let cities = current_grant(&pool, role, catalog.cities).await.unwrap();
    assert_eq!(cities.id, existing, "existing grant is updated in place");
    assert_eq!(cities.flags(), flags(true, true, false, false));

    let provinces = current_grant(&pool, role, catalog.provinces).await.unwrap();
    assert_eq!(provinces.flags(), flags(false, false, true, false));
    assert!(provinces.is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resubmitting_same_snapshot_writes_nothing(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let rows = vec![
        item_row(catalog.cities, catalog.master_data, CapabilityFlags::uniform(true)),
        item_row(catalog.upload, catalog.documents, flags(false, true, false, false)),
    ];

    let first = save_role(
        &pool,
        submission(None, "auditor", vec![catalog.master_data, catalog.documents], rows.clone()),
    )
    .await
    .unwrap();
    assert_eq!(first.created, 2);
    let role = first.role.id;
    let before = current_grant(&pool, role, catalog.cities).await.unwrap();

    let second = save_role(
        &pool,
        submission(Some(role), "auditor", vec![catalog.master_data, catalog.documents], rows),
    )
    .await
    .unwrap();

    assert_eq!((second.created, second.updated, second.unchanged), (0, 0, 2));
    let after = current_grant(&pool, role, catalog.cities).await.unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(grant_rows(&pool, role, catalog.cities).await.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failure_rolls_back_role_and_grants(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let role = create_role(&pool, "ops").await;

    let mut bad = submission(
        Some(role),
        "ops-renamed",
        vec![catalog.master_data],
        vec![
            item_row(catalog.cities, catalog.master_data, flags(true, false, false, false)),
            item_row(MenuId::new(987_654), catalog.master_data, flags(true, false, false, false)),
        ],
    );
    bad.role.name = "Renamed".into();

    let err = save_role(&pool, bad).await.unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err.fields.unwrap().contains_key("permissions"));

    let code: String = sqlx::query_scalar("SELECT code FROM roles WHERE id = $1")
        .bind(role)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(code, "ops");
    assert!(grant_rows(&pool, role, catalog.cities).await.is_empty());
}

/// Grants of menus left out of a submission (e.g. their module was
/// deselected) are kept as they were.
#[sqlx::test(migrations = "./migrations")]
async fn test_omitted_rows_keep_their_grants(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;

    let first = save_role(
        &pool,
        submission(
            None,
            "archivist",
            vec![catalog.master_data, catalog.documents],
            vec![
                item_row(catalog.cities, catalog.master_data, flags(false, true, false, false)),
                item_row(catalog.upload, catalog.documents, flags(true, true, false, false)),
            ],
        ),
    )
    .await
    .unwrap();
    let role = first.role.id;

    save_role(
        &pool,
        submission(
            Some(role),
            "archivist",
            vec![catalog.master_data],
            vec![item_row(catalog.cities, catalog.master_data, flags(false, false, false, false))],
        ),
    )
    .await
    .unwrap();

    let upload = current_grant(&pool, role, catalog.upload).await.unwrap();
    assert_eq!(upload.flags(), flags(true, true, false, false));
    let cities = current_grant(&pool, role, catalog.cities).await.unwrap();
    assert!(!cities.flags().any());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_leftover_rows_are_soft_deleted_before_create(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let role = create_role(&pool, "legacy").await;
    let stale = insert_grant(&pool, role, catalog.cities, CapabilityFlags::uniform(true), false).await;

    let summary = save_role(
        &pool,
        submission(
            Some(role),
            "legacy",
            vec![catalog.master_data],
            vec![item_row(catalog.cities, catalog.master_data, flags(false, true, false, false))],
        ),
    )
    .await
    .unwrap();
    assert_eq!(summary.created, 1);

    let rows = grant_rows(&pool, role, catalog.cities).await;
    assert_eq!(rows.len(), 2, "grants are never hard-deleted");
    assert_eq!(rows[0].id, stale);
    assert!(rows[0].deleted_at.is_some());
    assert!(!rows[0].is_current());
    assert!(rows[1].is_current());
    assert_eq!(rows[1].flags(), flags(false, true, false, false));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_module_rows_are_not_persisted(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    let module_row = PermissionRow {
        menu_id: catalog.master_data,
        parent_id: None,
        group: None,
        title: "Master Data".into(),
        flags: CapabilityFlags::uniform(true),
    };

    let summary = save_role(
        &pool,
        submission(
            None,
            "viewer",
            vec![catalog.master_data],
            vec![
                module_row,
                item_row(catalog.cities, catalog.master_data, flags(false, true, false, false)),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(summary.created, 1);
    assert!(grant_rows(&pool, summary.role.id, catalog.master_data).await.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_code_is_a_field_error(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;
    create_role(&pool, "finance").await;

    let err = save_role(
        &pool,
        submission(None, "finance", vec![catalog.master_data], vec![]),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = err.fields.unwrap();
    assert_eq!(fields["code"], vec!["Code has already been taken".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_updating_unknown_role_is_not_found(pool: PgPool) {
    let catalog = seed_catalog(&pool).await;

    let err = save_role(
        &pool,
        submission(
            Some(RoleId::new(424_242)),
            "ghost",
            vec![catalog.master_data],
            vec![item_row(catalog.cities, catalog.master_data, flags(true, false, false, false))],
        ),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status, StatusCode::NOT_FOUND);
    let grants: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role_menu_grants")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(grants, 0);
}
