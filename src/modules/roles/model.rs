use serde::{Deserialize, Serialize};
use signflow_core::serde::{deserialize_id_list, deserialize_optional_id};
use signflow_matrix::{MatrixEdit, MatrixState};
use signflow_models::{MenuId, RoleId};
use utoipa::{IntoParams, ToSchema};

/// Query of the catalog endpoint: `?module_ids=1,2&role_id=7`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Comma-separated module ids, in display order.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    #[param(value_type = Option<String>, example = "1,2")]
    pub module_ids: Vec<MenuId>,
    /// Role whose grants are joined on; omit for a new role.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[param(value_type = Option<i64>)]
    pub role_id: Option<RoleId>,
}

/// Query of the matrix endpoints: `?module_ids=1,2`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MatrixQuery {
    #[serde(default, deserialize_with = "deserialize_id_list")]
    #[param(value_type = Option<String>, example = "1,2")]
    pub module_ids: Vec<MenuId>,
}

/// One edit applied to a round-tripped matrix state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub state: MatrixState,
    pub edit: MatrixEdit,
}

/// Notice shown on the role list after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveNotice {
    RoleCreated,
    RoleUpdated,
}

impl SaveNotice {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveNotice::RoleCreated => "role_created",
            SaveNotice::RoleUpdated => "role_updated",
        }
    }

    /// Where the browser is sent after the save.
    pub fn redirect_target(self) -> String {
        format!("/roles?notice={}", self.as_str())
    }
}
