//! Rule writing: regenerate the data region of a template decision table
//!
//! The template's rows above the data start row are carried over untouched;
//! everything at or below it is replaced by one row per rule. The template
//! bytes themselves are never mutated; output is always a fresh buffer.

use crate::error::{RuleError, RuleResult};
use crate::sheet::{read_sheet, SheetCell, SheetFormat};
use crate::table::layout::TableLayout;
use crate::types::{CellValue, Rule};
use rust_xlsxwriter::{Formula, Workbook};

/// Regenerate a decision table from a template and a rule list.
///
/// Fails with the template's format error before producing any output when
/// the data start row cannot be located. The result is always the modern
/// zip-based container, whichever variant the template arrived in.
pub fn write_rules(template: &[u8], format: SheetFormat, rules: &[Rule]) -> RuleResult<Vec<u8>> {
    let template_rows = read_sheet(template, format)?;
    let layout = TableLayout::detect(&template_rows)?;
    let rows = compose_rows(&template_rows, &layout, rules);
    serialize_rows(&rows)
}

/// Pure composition step: template header region + one row per rule.
///
/// Column 0 carries the rule name; condition columns follow in label order,
/// then action columns. A rule missing a label contributes no cell at all
/// for it, not a blank string.
pub fn compose_rows(
    template: &[Vec<SheetCell>],
    layout: &TableLayout,
    rules: &[Rule],
) -> Vec<Vec<SheetCell>> {
    let keep = layout.data_start_row.min(template.len());
    let mut rows: Vec<Vec<SheetCell>> = template[..keep].to_vec();

    // The data start row can sit past the template's last populated row;
    // pad so rule rows land at their absolute position.
    while rows.len() < layout.data_start_row {
        rows.push(Vec::new());
    }

    for rule in rules {
        let mut row = Vec::with_capacity(
            1 + layout.condition_labels.len() + layout.action_labels.len(),
        );
        row.push(SheetCell::Text(rule.name.clone()));
        for label in &layout.condition_labels {
            row.push(cell_for(rule.conditions.get(label)));
        }
        for label in &layout.action_labels {
            row.push(cell_for(rule.actions.get(label)));
        }
        rows.push(row);
    }

    rows
}

fn cell_for(value: Option<&CellValue>) -> SheetCell {
    match value {
        None => SheetCell::Empty,
        Some(CellValue::Text(s)) => SheetCell::Text(s.clone()),
        Some(CellValue::Number(n)) => SheetCell::Number(*n),
        Some(CellValue::Bool(b)) => SheetCell::Bool(*b),
    }
}

fn serialize_rows(rows: &[Vec<SheetCell>]) -> RuleResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (row_idx, col_idx) = (r as u32, c as u16);
            match cell {
                SheetCell::Empty => continue,
                SheetCell::Text(s) => {
                    worksheet
                        .write_string(row_idx, col_idx, s)
                        .map_err(|e| RuleError::Sheet(format!("failed to write cell: {}", e)))?;
                }
                SheetCell::Number(n) => {
                    worksheet
                        .write_number(row_idx, col_idx, *n)
                        .map_err(|e| RuleError::Sheet(format!("failed to write cell: {}", e)))?;
                }
                SheetCell::Bool(b) => {
                    worksheet
                        .write_boolean(row_idx, col_idx, *b)
                        .map_err(|e| RuleError::Sheet(format!("failed to write cell: {}", e)))?;
                }
                SheetCell::Formula(src) => {
                    worksheet
                        .write_formula(row_idx, col_idx, Formula::new(src))
                        .map_err(|e| RuleError::Sheet(format!("failed to write cell: {}", e)))?;
                }
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| RuleError::Sheet(format!("failed to serialize workbook: {}", e)))
}
