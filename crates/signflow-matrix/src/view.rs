//! Render model for the matrix editor.
//!
//! Rows are shown per module, then per group label in the order labels first
//! appear. Indices in the view are indices into the editor's row set, so a
//! client can send them back as [`MatrixEdit::Row`](crate::MatrixEdit) edits.

use serde::{Deserialize, Serialize};
use signflow_models::{Capability, MenuId, PermissionRow, RoleId};
use utoipa::ToSchema;

use crate::aggregate::TriState;
use crate::editor::MatrixEditor;

/// A checkbox that can also be indeterminate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckboxState {
    pub checked: bool,
    pub indeterminate: bool,
}

impl From<TriState> for CheckboxState {
    fn from(state: TriState) -> Self {
        match state {
            TriState::All => Self {
                checked: true,
                indeterminate: false,
            },
            TriState::None => Self::default(),
            TriState::Mixed => Self {
                checked: false,
                indeterminate: true,
            },
        }
    }
}

impl From<bool> for CheckboxState {
    fn from(checked: bool) -> Self {
        Self {
            checked,
            indeterminate: false,
        }
    }
}

/// Serializable editor state that clients round-trip between edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatrixState {
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub module_ids: Vec<MenuId>,
    #[serde(default)]
    pub rows: Vec<PermissionRow>,
}

impl From<&MatrixEditor> for MatrixState {
    fn from(editor: &MatrixEditor) -> Self {
        Self {
            role_id: editor.role_id(),
            module_ids: editor.selected_modules().to_vec(),
            rows: editor.snapshot(),
        }
    }
}

impl From<MatrixState> for MatrixEditor {
    fn from(state: MatrixState) -> Self {
        MatrixEditor::with_rows(state.role_id, state.module_ids, state.rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RowView {
    /// Position in the editor's row set.
    pub index: usize,
    #[serde(flatten)]
    pub row: PermissionRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupSection {
    pub label: Option<String>,
    pub rows: Vec<RowView>,
}

/// Rows under one module. Rows that appear before any module row are
/// collected in a section without a `menu_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModuleSection {
    pub menu_id: Option<MenuId>,
    pub title: String,
    pub groups: Vec<GroupSection>,
}

impl ModuleSection {
    fn push(&mut self, row: RowView) {
        match self.groups.iter_mut().find(|g| g.label == row.row.group) {
            Some(group) => group.rows.push(row),
            None => self.groups.push(GroupSection {
                label: row.row.group.clone(),
                rows: vec![row],
            }),
        }
    }
}

/// "Select all" checkbox of one capability column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CapabilityToggle {
    pub capability: Capability,
    pub state: TriState,
    pub checkbox: CheckboxState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatrixView {
    pub role_id: Option<RoleId>,
    pub module_ids: Vec<MenuId>,
    pub sections: Vec<ModuleSection>,
    pub capabilities: Vec<CapabilityToggle>,
    pub master: CheckboxState,
    pub editable_rows: usize,
    /// Message of the last failed catalog load, if any.
    pub fetch_error: Option<String>,
    pub state: MatrixState,
}

impl MatrixView {
    pub fn from_editor(editor: &MatrixEditor) -> Self {
        let mut sections: Vec<ModuleSection> = Vec::new();

        for (index, row) in editor.rows().iter().enumerate() {
            if row.is_module() {
                sections.push(ModuleSection {
                    menu_id: Some(row.menu_id),
                    title: row.title.clone(),
                    groups: Vec::new(),
                });
                continue;
            }

            if sections.is_empty() {
                sections.push(ModuleSection {
                    menu_id: None,
                    title: String::new(),
                    groups: Vec::new(),
                });
            }
            if let Some(section) = sections.last_mut() {
                section.push(RowView {
                    index,
                    row: row.clone(),
                });
            }
        }

        let capabilities = Capability::ALL
            .into_iter()
            .map(|capability| {
                let state = editor.aggregate(capability);
                CapabilityToggle {
                    capability,
                    state,
                    checkbox: state.into(),
                }
            })
            .collect();

        Self {
            role_id: editor.role_id(),
            module_ids: editor.selected_modules().to_vec(),
            sections,
            capabilities,
            master: editor.master().into(),
            editable_rows: editor.editable_rows(),
            fetch_error: editor.fetch_error().map(ToString::to_string),
            state: MatrixState::from(editor),
        }
    }
}

impl From<&MatrixEditor> for MatrixView {
    fn from(editor: &MatrixEditor) -> Self {
        Self::from_editor(editor)
    }
}
