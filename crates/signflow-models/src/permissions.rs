//! Capability flags, permission rows and persisted grants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{GrantId, MenuId, RoleId};

/// One of the four independent permission dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Create,
    Read,
    Update,
    Delete,
}

impl Capability {
    /// All capabilities in display order.
    pub const ALL: [Capability; 4] = [
        Capability::Create,
        Capability::Read,
        Capability::Update,
        Capability::Delete,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Capability::Create => "create",
            Capability::Read => "read",
            Capability::Update => "update",
            Capability::Delete => "delete",
        }
    }

    /// Position of this capability in [`Capability::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Capability::Create => 0,
            Capability::Read => 1,
            Capability::Update => 2,
            Capability::Delete => 3,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Capability::Create),
            "read" => Ok(Capability::Read),
            "update" => Ok(Capability::Update),
            "delete" => Ok(Capability::Delete),
            other => Err(format!("Unknown capability: {}", other)),
        }
    }
}

/// The four capability booleans of a row or grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CapabilityFlags {
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub delete: bool,
}

impl CapabilityFlags {
    /// Every capability set to `value`.
    pub const fn uniform(value: bool) -> Self {
        Self {
            create: value,
            read: value,
            update: value,
            delete: value,
        }
    }

    pub const fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::Create => self.create,
            Capability::Read => self.read,
            Capability::Update => self.update,
            Capability::Delete => self.delete,
        }
    }

    pub fn set(&mut self, capability: Capability, value: bool) {
        match capability {
            Capability::Create => self.create = value,
            Capability::Read => self.read = value,
            Capability::Update => self.update = value,
            Capability::Delete => self.delete = value,
        }
    }

    pub fn any(&self) -> bool {
        self.create || self.read || self.update || self.delete
    }
}

/// One row of the permission matrix.
///
/// Rows without a parent are module rows: they head a section of the matrix
/// and never carry capability state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PermissionRow {
    pub menu_id: MenuId,
    pub parent_id: Option<MenuId>,
    pub group: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub flags: CapabilityFlags,
}

impl PermissionRow {
    pub fn is_module(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Only rows under a module may be edited or persisted.
    pub fn is_editable(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A persisted (role, menu) capability record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grant {
    pub id: GrantId,
    pub role_id: RoleId,
    pub menu_id: MenuId,
    pub can_create: bool,
    pub can_read: bool,
    pub can_update: bool,
    pub can_delete: bool,
    pub is_active: bool,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Grant {
    pub fn flags(&self) -> CapabilityFlags {
        CapabilityFlags {
            create: self.can_create,
            read: self.can_read,
            update: self.can_update,
            delete: self.can_delete,
        }
    }

    pub fn is_current(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_round_trips_through_str() {
        for capability in Capability::ALL {
            assert_eq!(capability.as_str().parse::<Capability>(), Ok(capability));
            assert_eq!(Capability::ALL[capability.index()], capability);
        }
        assert!("approve".parse::<Capability>().is_err());
    }

    #[test]
    fn test_flags_get_set() {
        let mut flags = CapabilityFlags::default();
        assert!(!flags.any());

        flags.set(Capability::Update, true);
        assert!(flags.get(Capability::Update));
        assert!(!flags.get(Capability::Read));
        assert!(flags.any());
        assert!(CapabilityFlags::uniform(true).get(Capability::Delete));
    }

    #[test]
    fn test_row_serializes_flat() {
        let row = PermissionRow {
            menu_id: MenuId::new(10),
            parent_id: Some(MenuId::new(1)),
            group: Some("Master Data".into()),
            title: "Cities".into(),
            flags: CapabilityFlags {
                read: true,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["menu_id"], 10);
        assert_eq!(json["parent_id"], 1);
        assert_eq!(json["read"], true);
        assert_eq!(json["delete"], false);
        assert!(row.is_editable());
    }
}
