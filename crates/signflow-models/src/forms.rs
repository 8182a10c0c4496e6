//! Codec for the role editor's form-encoded submission.
//!
//! Scalar role fields are posted as plain keys (`code`, `name`, `is_active`),
//! the module selection as repeated `module_ids[]` keys, and the permission
//! matrix as a repeated group with one index per row:
//!
//! ```text
//! permissions[0].menu_id=10
//! permissions[0].parent_id=1
//! permissions[0].group=Master Data
//! permissions[0].title=Cities
//! permissions[0].read=on
//! ```
//!
//! Capability values are coerced with [`coerce_bool`]; an absent capability
//! key is `false`, matching how browsers omit unchecked checkboxes.

use std::collections::BTreeMap;

use signflow_core::FieldErrors;
use signflow_core::serde::coerce_bool;

use crate::ids::{MenuId, RoleId};
use crate::permissions::{Capability, CapabilityFlags, PermissionRow};
use crate::roles::{RoleFields, RoleSubmission};

/// Types that can be built from decoded `application/x-www-form-urlencoded`
/// pairs.
pub trait FromFormPairs: Sized {
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, FieldErrors>;
}

#[derive(Default)]
struct RowDraft {
    menu_id: Option<String>,
    parent_id: Option<String>,
    group: Option<String>,
    title: Option<String>,
    flags: CapabilityFlags,
}

/// Splits `permissions[3].read` into `(3, "read")`.
fn parse_permission_key(key: &str) -> Option<(usize, &str)> {
    let rest = key.strip_prefix("permissions[")?;
    let (index, field) = rest.split_once("].")?;
    let index = index.parse::<usize>().ok()?;
    Some((index, field))
}

fn push_error(errors: &mut FieldErrors, field: impl Into<String>, message: impl Into<String>) {
    errors.entry(field.into()).or_default().push(message.into());
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_menu_id(
    raw: Option<String>,
    field: String,
    errors: &mut FieldErrors,
) -> Option<Option<MenuId>> {
    match non_empty(raw) {
        None => Some(None),
        Some(value) => match value.parse::<MenuId>() {
            Ok(id) => Some(Some(id)),
            Err(_) => {
                push_error(errors, field, "Must be a numeric menu id");
                None
            }
        },
    }
}

impl FromFormPairs for RoleSubmission {
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut code = String::new();
        let mut name = String::new();
        let mut is_active = false;
        let mut module_ids = Vec::new();
        let mut drafts: BTreeMap<usize, RowDraft> = BTreeMap::new();

        for (key, value) in pairs {
            match key.as_str() {
                "code" => code = value.trim().to_string(),
                "name" => name = value.trim().to_string(),
                "is_active" => is_active = coerce_bool(&value),
                "module_ids" | "module_ids[]" => {
                    if value.trim().is_empty() {
                        continue;
                    }
                    match value.parse::<MenuId>() {
                        Ok(id) if !module_ids.contains(&id) => module_ids.push(id),
                        Ok(_) => {}
                        Err(_) => push_error(&mut errors, "module_ids", "Invalid module id"),
                    }
                }
                other => {
                    let Some((index, field)) = parse_permission_key(other) else {
                        // Unknown keys (CSRF tokens, submit buttons) are ignored.
                        continue;
                    };
                    let draft = drafts.entry(index).or_default();
                    match field {
                        "menu_id" => draft.menu_id = Some(value),
                        "parent_id" => draft.parent_id = Some(value),
                        "group" => draft.group = Some(value),
                        "title" => draft.title = Some(value),
                        capability => match capability.parse::<Capability>() {
                            Ok(capability) => draft.flags.set(capability, coerce_bool(&value)),
                            Err(_) => push_error(&mut errors, other, "Unknown permission field"),
                        },
                    }
                }
            }
        }

        let mut permissions = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts {
            let menu_field = format!("permissions[{}].menu_id", index);
            let parent_field = format!("permissions[{}].parent_id", index);

            let menu_id = match parse_menu_id(draft.menu_id, menu_field.clone(), &mut errors) {
                Some(Some(id)) => Some(id),
                Some(None) => {
                    push_error(&mut errors, menu_field, "Menu is required");
                    None
                }
                None => None,
            };
            let parent_id = parse_menu_id(draft.parent_id, parent_field, &mut errors);

            if let (Some(menu_id), Some(parent_id)) = (menu_id, parent_id) {
                permissions.push(PermissionRow {
                    menu_id,
                    parent_id,
                    group: non_empty(draft.group),
                    title: draft.title.unwrap_or_default(),
                    flags: draft.flags,
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RoleSubmission {
            role: RoleFields {
                id: None,
                code,
                name,
                is_active,
            },
            module_ids,
            permissions,
        })
    }
}

/// Encodes rows as the repeated `permissions[i].*` group.
///
/// Every capability is written explicitly as `1` or `0` so a decoded
/// submission does not depend on checkbox omission.
pub fn encode_permission_rows(rows: &[PermissionRow]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(rows.len() * 8);
    for (index, row) in rows.iter().enumerate() {
        let key = |field: &str| format!("permissions[{}].{}", index, field);
        pairs.push((key("menu_id"), row.menu_id.to_string()));
        pairs.push((
            key("parent_id"),
            row.parent_id.map(|id| id.to_string()).unwrap_or_default(),
        ));
        pairs.push((key("group"), row.group.clone().unwrap_or_default()));
        pairs.push((key("title"), row.title.clone()));
        for capability in Capability::ALL {
            let value = if row.flags.get(capability) { "1" } else { "0" };
            pairs.push((key(capability.as_str()), value.to_string()));
        }
    }
    pairs
}

/// Encodes a full submission, including the role's scalar fields.
pub fn encode_role_submission(submission: &RoleSubmission) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("code".to_string(), submission.role.code.clone()),
        ("name".to_string(), submission.role.name.clone()),
        (
            "is_active".to_string(),
            if submission.role.is_active { "1" } else { "0" }.to_string(),
        ),
    ];
    pairs.extend(
        submission
            .module_ids
            .iter()
            .map(|id| ("module_ids[]".to_string(), id.to_string())),
    );
    pairs.extend(encode_permission_rows(&submission.permissions));
    pairs
}

/// Role id of a submission is taken from the route, never from the body.
pub fn with_role_id(mut submission: RoleSubmission, id: Option<RoleId>) -> RoleSubmission {
    submission.role.id = id;
    submission
}
