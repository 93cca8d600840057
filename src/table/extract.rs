//! Rule extraction: header row + data rows → typed rule records

use crate::sheet::SheetCell;
use crate::table::classify::{classify_header, HeaderRole};
use crate::types::{CellValue, Rule};
use std::collections::HashMap;

/// Build one rule per data row, treating the first row as header labels.
///
/// Batch ids are assigned 1..N in row order. Trailing missing cells are
/// tolerated; in-range blank cells still contribute an empty text value to
/// their classified bucket, exactly like a blank spreadsheet cell would.
pub fn extract_rules(rows: &[Vec<SheetCell>]) -> Vec<Rule> {
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(SheetCell::as_text).collect();

    data_rows
        .iter()
        .enumerate()
        .map(|(index, row)| extract_rule(index as u64 + 1, &headers, row))
        .collect()
}

fn extract_rule(id: u64, headers: &[String], row: &[SheetCell]) -> Rule {
    let mut name = String::new();
    let mut description: Option<String> = None;
    let mut conditions: HashMap<String, CellValue> = HashMap::new();
    let mut actions: HashMap<String, CellValue> = HashMap::new();

    for (column, header) in headers.iter().enumerate() {
        let Some(cell) = row.get(column) else {
            break;
        };
        let value = to_cell_value(cell);
        match classify_header(header) {
            HeaderRole::Name => name = value.as_text(),
            HeaderRole::Description => {
                let text = value.as_text();
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            HeaderRole::Condition => {
                conditions.insert(header.clone(), value);
            }
            HeaderRole::Action => {
                actions.insert(header.clone(), value);
            }
        }
    }

    if name.trim().is_empty() {
        name = format!("Rule {}", id);
    }

    Rule {
        id,
        name,
        description,
        conditions,
        actions,
        active: true,
    }
}

fn to_cell_value(cell: &SheetCell) -> CellValue {
    match cell {
        SheetCell::Empty => CellValue::Text(String::new()),
        SheetCell::Text(s) => CellValue::Text(s.clone()),
        SheetCell::Number(n) => CellValue::Number(*n),
        SheetCell::Bool(b) => CellValue::Bool(*b),
        SheetCell::Formula(src) => CellValue::Text(src.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> SheetCell {
        SheetCell::Text(s.to_string())
    }

    fn sheet(rows: &[Vec<SheetCell>]) -> Vec<Vec<SheetCell>> {
        rows.to_vec()
    }

    #[test]
    fn test_extract_assigns_batch_ids_from_one() {
        let rows = sheet(&[
            vec![text("Rule Name"), text("Condition: Age")],
            vec![text("Adults"), SheetCell::Number(18.0)],
            vec![text("Seniors"), SheetCell::Number(65.0)],
        ]);
        let rules = extract_rules(&rows);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, 1);
        assert_eq!(rules[1].id, 2);
        assert_eq!(rules[0].name, "Adults");
        assert_eq!(
            rules[0].conditions.get("Condition: Age"),
            Some(&CellValue::Number(18.0))
        );
    }

    #[test]
    fn test_extract_classifies_every_column() {
        let rows = sheet(&[
            vec![
                text("Rule Name"),
                text("Description"),
                text("When Age"),
                text("Then Approve"),
                text("Score"),
            ],
            vec![
                text("R1"),
                text("first rule"),
                SheetCell::Number(30.0),
                SheetCell::Bool(true),
                SheetCell::Number(7.0),
            ],
        ]);
        let rules = extract_rules(&rows);
        let rule = &rules[0];
        assert_eq!(rule.name, "R1");
        assert_eq!(rule.description.as_deref(), Some("first rule"));
        assert_eq!(rule.conditions.get("When Age"), Some(&CellValue::Number(30.0)));
        assert_eq!(rule.actions.get("Then Approve"), Some(&CellValue::Bool(true)));
        // Unrecognized labels land in the condition bucket.
        assert_eq!(rule.conditions.get("Score"), Some(&CellValue::Number(7.0)));
        assert_eq!(rule.conditions.len() + rule.actions.len(), 3);
    }

    #[test]
    fn test_blank_name_falls_back_to_rule_id() {
        let rows = sheet(&[
            vec![text("Name"), text("When Age")],
            vec![text("  "), SheetCell::Number(21.0)],
            vec![SheetCell::Empty, SheetCell::Number(22.0)],
        ]);
        let rules = extract_rules(&rows);
        assert_eq!(rules[0].name, "Rule 1");
        assert_eq!(rules[1].name, "Rule 2");
    }

    #[test]
    fn test_ragged_rows_skip_trailing_cells() {
        let rows = sheet(&[
            vec![text("Name"), text("When Age"), text("Then Approve")],
            vec![text("R1")],
        ]);
        let rules = extract_rules(&rows);
        assert_eq!(rules[0].name, "R1");
        assert!(rules[0].conditions.is_empty());
        assert!(rules[0].actions.is_empty());
    }

    #[test]
    fn test_in_range_blank_cell_contributes_empty_text() {
        let rows = sheet(&[
            vec![text("Name"), text("When Age"), text("Then Approve")],
            vec![text("R1"), SheetCell::Empty, SheetCell::Bool(false)],
        ]);
        let rules = extract_rules(&rows);
        assert_eq!(
            rules[0].conditions.get("When Age"),
            Some(&CellValue::Text(String::new()))
        );
        assert_eq!(rules[0].actions.get("Then Approve"), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn test_extra_cells_beyond_headers_ignored() {
        let rows = sheet(&[
            vec![text("Name"), text("When Age")],
            vec![text("R1"), SheetCell::Number(30.0), text("spillover")],
        ]);
        let rules = extract_rules(&rows);
        assert_eq!(rules[0].conditions.len(), 1);
    }

    #[test]
    fn test_formula_cell_contributes_source_text() {
        let rows = sheet(&[
            vec![text("Name"), text("When Age")],
            vec![text("R1"), SheetCell::Formula("A1+1".to_string())],
        ]);
        let rules = extract_rules(&rows);
        assert_eq!(
            rules[0].conditions.get("When Age"),
            Some(&CellValue::Text("A1+1".to_string()))
        );
    }

    #[test]
    fn test_empty_sheet_yields_no_rules() {
        assert!(extract_rules(&[]).is_empty());
        assert!(extract_rules(&sheet(&[vec![text("Name")]])).is_empty());
    }
}
