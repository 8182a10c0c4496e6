use signflow_core::ErrorResponse;
use signflow_matrix::{
    CapabilityToggle, CheckboxState, GroupSection, MatrixEdit, MatrixState, MatrixView,
    ModuleSection, RowView, SettleReport, SyncState, TriState,
};
use signflow_models::{
    Capability, CapabilityFlags, CatalogEntry, CatalogPage, MenuNode, PermissionRow, Role,
    RoleFields, RoleSubmission,
};
use utoipa::OpenApi;

use crate::modules::roles::model::PreviewRequest;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::roles::controller::get_catalog,
        crate::modules::roles::controller::get_new_role_matrix,
        crate::modules::roles::controller::get_role_matrix,
        crate::modules::roles::controller::preview_matrix,
        crate::modules::roles::controller::create_role,
        crate::modules::roles::controller::update_role,
    ),
    components(
        schemas(
            Capability,
            CapabilityFlags,
            CapabilityToggle,
            CatalogEntry,
            CatalogPage,
            CheckboxState,
            ErrorResponse,
            GroupSection,
            MatrixEdit,
            MatrixState,
            MatrixView,
            MenuNode,
            ModuleSection,
            PermissionRow,
            PreviewRequest,
            Role,
            RoleFields,
            RoleSubmission,
            RowView,
            SettleReport,
            SyncState,
            TriState,
        )
    ),
    tags(
        (name = "Roles", description = "Role permission matrix editing and saving")
    ),
    info(
        title = "Signflow Console API",
        version = "0.1.0",
        description = "Role permission matrix editor for the Signflow document workflow console"
    )
)]
pub struct ApiDoc;
