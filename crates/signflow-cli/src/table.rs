//! Plain-text rendering of a permission matrix.

use std::fmt::Write;

use signflow_matrix::{CheckboxState, MatrixView};
use signflow_models::Capability;

const TITLE_WIDTH: usize = 28;
const CELL_WIDTH: usize = 8;

fn cell(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn checkbox(state: CheckboxState) -> &'static str {
    if state.indeterminate {
        "[-]"
    } else {
        cell(state.checked)
    }
}

fn push_line(out: &mut String, title: &str, cells: impl IntoIterator<Item = &'static str>) {
    let _ = write!(out, "{:<width$}", title, width = TITLE_WIDTH);
    for value in cells {
        let _ = write!(out, "{:^width$}", value, width = CELL_WIDTH);
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
}

/// Renders `view` as a fixed-width table: a header, one block per module with
/// its groups and rows, then the "select all" row and the master toggle.
pub fn render(view: &MatrixView) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<width$}", "Menu", width = TITLE_WIDTH);
    for capability in Capability::ALL {
        let _ = write!(out, "{:^width$}", capability.as_str(), width = CELL_WIDTH);
    }
    out.push('\n');
    out.push_str(&"-".repeat(TITLE_WIDTH + CELL_WIDTH * Capability::ALL.len()));
    out.push('\n');

    for section in &view.sections {
        let _ = writeln!(out, "{}", section.title);
        for group in &section.groups {
            if let Some(label) = &group.label {
                let _ = writeln!(out, "  {}", label);
            }
            for row in &group.rows {
                let title = format!("    {}", row.row.title);
                push_line(
                    &mut out,
                    &title,
                    Capability::ALL.map(|c| cell(row.row.flags.get(c))),
                );
            }
        }
    }

    out.push_str(&"-".repeat(TITLE_WIDTH + CELL_WIDTH * Capability::ALL.len()));
    out.push('\n');
    push_line(
        &mut out,
        "Select all",
        view.capabilities.iter().map(|toggle| checkbox(toggle.checkbox)),
    );
    let _ = writeln!(out, "All privileges {}", checkbox(view.master));

    if let Some(error) = &view.fetch_error {
        let _ = writeln!(out, "\n⚠️  {}", error);
    }

    out
}
