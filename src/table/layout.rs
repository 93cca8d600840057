//! Decision-table header location
//!
//! Templates place their role markers at author-chosen offsets, so the
//! layout is derived fresh for every spreadsheet and never cached.

use crate::error::{RuleError, RuleResult};
use crate::sheet::SheetCell;
use serde::Serialize;

/// Markers are searched in rows 0..=20 of the first sheet.
pub const MARKER_SCAN_ROWS: usize = 21;

const CONDITION_MARKER: &str = "CONDITION";
const ACTION_MARKER: &str = "ACTION";

/// Rows reserved between a role marker and the first data row: the marker
/// itself, the column-label row, and one spacer.
const MARKER_TO_DATA_GAP: usize = 3;

/// Positional metadata for one template spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub condition_row: Option<usize>,
    pub action_row: Option<usize>,
    pub condition_labels: Vec<String>,
    pub action_labels: Vec<String>,
    pub data_start_row: usize,
}

impl TableLayout {
    /// Scan a template's rows for the decision-table structure.
    ///
    /// Fails with a format error when neither marker appears within the
    /// scanned window; a missing *individual* marker only yields an empty
    /// label list for that role.
    pub fn detect(rows: &[Vec<SheetCell>]) -> RuleResult<Self> {
        let condition_row = find_marker_row(rows, CONDITION_MARKER);
        let action_row = find_marker_row(rows, ACTION_MARKER);

        let first_marker = match (condition_row, action_row) {
            (Some(c), Some(a)) => c.min(a),
            (Some(c), None) => c,
            (None, Some(a)) => a,
            (None, None) => {
                return Err(RuleError::TemplateFormat(format!(
                    "no CONDITION or ACTION marker found in the first {} rows",
                    MARKER_SCAN_ROWS
                )))
            }
        };

        Ok(Self {
            condition_row,
            action_row,
            condition_labels: column_labels(rows, condition_row),
            action_labels: column_labels(rows, action_row),
            data_start_row: first_marker + MARKER_TO_DATA_GAP,
        })
    }
}

/// Trimmed, upper-cased text of a row's column-0 cell.
fn marker_text(row: &[SheetCell]) -> String {
    row.first()
        .map(|cell| cell.as_text().trim().to_uppercase())
        .unwrap_or_default()
}

fn find_marker_row(rows: &[Vec<SheetCell>], marker: &str) -> Option<usize> {
    rows.iter()
        .take(MARKER_SCAN_ROWS)
        .position(|row| marker_text(row) == marker)
}

/// Column labels for a role: the row immediately below its marker, cells
/// from index 1 on, non-empty trimmed text in column order.
fn column_labels(rows: &[Vec<SheetCell>], marker_row: Option<usize>) -> Vec<String> {
    let Some(marker_row) = marker_row else {
        return Vec::new();
    };
    let Some(label_row) = rows.get(marker_row + 1) else {
        return Vec::new();
    };
    label_row
        .iter()
        .skip(1)
        .map(|cell| cell.as_text().trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}
