//! Role models and the role submission handled by the reconciliation writer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{MenuId, RoleId};
use crate::permissions::PermissionRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: RoleId,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Role codes are short identifiers: letters, digits, `_` and `-`.
fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("code_format")
            .with_message("Code may only contain letters, digits, '_' and '-'".into()))
    }
}

/// The role's own scalar fields as submitted by the editor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RoleFields {
    /// Set when updating an existing role.
    pub id: Option<RoleId>,
    #[validate(
        length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"),
        custom(function = "validate_code")
    )]
    pub code: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    pub is_active: bool,
}

/// Everything the editor submits on save.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RoleSubmission {
    #[validate(nested)]
    pub role: RoleFields,
    #[validate(length(min = 1, message = "Select at least one module"))]
    pub module_ids: Vec<MenuId>,
    pub permissions: Vec<PermissionRow>,
}

/// What a save did to the grant table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconcileSummary {
    pub role: Role,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(code: &str, name: &str) -> RoleFields {
        RoleFields {
            id: None,
            code: code.to_string(),
            name: name.to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_role_fields_validation() {
        assert!(fields("finance-admin", "Finance Admin").validate().is_ok());
        assert!(fields("", "Finance Admin").validate().is_err());
        assert!(fields("finance admin", "Finance Admin").validate().is_err());
        assert!(fields("finance", "").validate().is_err());
        assert!(fields(&"x".repeat(51), "Finance").validate().is_err());
    }

    #[test]
    fn test_submission_requires_a_module() {
        let submission = RoleSubmission {
            role: fields("ops", "Operations"),
            module_ids: vec![],
            permissions: vec![],
        };
        let errors = submission.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("module_ids"));

        let submission = RoleSubmission {
            module_ids: vec![MenuId::new(1)],
            ..submission
        };
        assert!(submission.validate().is_ok());
    }
}
