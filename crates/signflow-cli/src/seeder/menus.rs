//! Menu catalog seeding.
//!
//! Inserts the console's module tree: one module per top-level screen area,
//! each with grouped menu items beneath it.

use signflow_models::{CreateMenuDto, MenuId};
use sqlx::{PgConnection, PgPool};
use std::time::Instant;
use validator::Validate;

/// A module title and its `(group, items)` pairs.
pub type ModuleSeed = (&'static str, &'static [(&'static str, &'static [&'static str])]);

pub const DEFAULT_CATALOG: &[ModuleSeed] = &[
    (
        "Master Data",
        &[
            ("Regions", &["Cities", "Provinces"]),
            ("Parties", &["Companies", "Clients"]),
        ],
    ),
    (
        "Documents",
        &[("Workflow", &["Upload", "Signing", "Templates"])],
    ),
    (
        "Identity",
        &[("KYC", &["Identity Capture", "Verification"])],
    ),
    (
        "Access Control",
        &[("Security", &["Roles", "Users"])],
    ),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuSeedSummary {
    pub modules: usize,
    pub items: usize,
}

/// Builds the insert DTOs of one module's items, positions counting across
/// groups.
pub fn item_dtos(module_id: MenuId, groups: &[(&str, &[&str])]) -> Vec<CreateMenuDto> {
    groups
        .iter()
        .flat_map(|(group, items)| items.iter().map(move |title| (*group, *title)))
        .enumerate()
        .map(|(position, (group, title))| CreateMenuDto {
            parent_id: Some(module_id),
            title: title.to_string(),
            group: Some(group.to_string()),
            position: position as i32,
        })
        .collect()
}

async fn insert_menu(
    conn: &mut PgConnection,
    dto: &CreateMenuDto,
) -> Result<MenuId, Box<dyn std::error::Error>> {
    dto.validate()?;

    let id = sqlx::query_scalar::<_, MenuId>(
        "INSERT INTO menus (parent_id, title, group_label, position)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(dto.parent_id)
    .bind(&dto.title)
    .bind(&dto.group)
    .bind(dto.position)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Seeds [`DEFAULT_CATALOG`] in one transaction.
pub async fn seed_menus(db: &PgPool) -> Result<MenuSeedSummary, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📊 Seeding {} modules...", DEFAULT_CATALOG.len());

    let mut tx = db.begin().await?;
    let mut summary = MenuSeedSummary::default();

    for (position, (title, groups)) in DEFAULT_CATALOG.iter().enumerate() {
        let module = CreateMenuDto {
            parent_id: None,
            title: title.to_string(),
            group: None,
            position: position as i32,
        };
        let module_id = insert_menu(&mut *tx, &module).await?;
        summary.modules += 1;

        for dto in item_dtos(module_id, groups) {
            insert_menu(&mut *tx, &dto).await?;
            summary.items += 1;
        }
        println!("   ✓ {} (id {})", title, module_id);
    }

    tx.commit().await?;
    println!(
        "   ✓ Inserted {} modules and {} items in {:?}",
        summary.modules,
        summary.items,
        start_time.elapsed()
    );

    Ok(summary)
}

/// Removes the whole catalog. Grants go with it through `ON DELETE CASCADE`.
pub async fn clear_menus(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let result = sqlx::query("DELETE FROM menus").execute(db).await?;
    Ok(result.rows_affected())
}
