//! Spreadsheet reading: .xls / .xlsx bytes → ordered rows of typed cells
//!
//! The reader is purely positional. It knows nothing about decision-table
//! semantics; it hands the table layer rows of [`SheetCell`]s addressed from
//! (0,0) so marker rows land at their template offsets.

use crate::error::{RuleError, RuleResult};
use calamine::{Data, Range, Reader, Sheets, Xls, Xlsx};
use std::io::Cursor;
use std::path::Path;

/// The two supported workbook containers: legacy binary and modern zip-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xls,
    Xlsx,
}

impl SheetFormat {
    /// Resolve a declared file extension, rejecting anything unsupported
    /// before parsing begins.
    pub fn from_extension(ext: &str) -> RuleResult<Self> {
        match ext.to_lowercase().as_str() {
            "xls" => Ok(SheetFormat::Xls),
            "xlsx" => Ok(SheetFormat::Xlsx),
            other => Err(RuleError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> RuleResult<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SheetFormat::Xls => "xls",
            SheetFormat::Xlsx => "xlsx",
        }
    }
}

/// One cell as read from the first worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula source text, not a computed value.
    Formula(String),
}

impl SheetCell {
    /// Textual form, matching how headers and labels are compared.
    pub fn as_text(&self) -> String {
        match self {
            SheetCell::Empty => String::new(),
            SheetCell::Text(s) => s.clone(),
            SheetCell::Number(n) => crate::types::format_number(*n),
            SheetCell::Bool(b) => b.to_string(),
            SheetCell::Formula(src) => src.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SheetCell::Empty)
    }
}

/// Read the first worksheet into rows of typed cells.
///
/// Date-formatted numeric cells come back as their textual date rendering,
/// formula cells as their source text. Trailing empty cells are trimmed per
/// row, so ragged rows keep their natural width.
pub fn read_sheet(bytes: &[u8], format: SheetFormat) -> RuleResult<Vec<Vec<SheetCell>>> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Sheets<_> = match format {
        SheetFormat::Xlsx => Sheets::Xlsx(
            Xlsx::new(cursor).map_err(|e| RuleError::Sheet(format!("failed to open workbook: {}", e)))?,
        ),
        SheetFormat::Xls => Sheets::Xls(
            Xls::new(cursor).map_err(|e| RuleError::Sheet(format!("failed to open workbook: {}", e)))?,
        ),
    };

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| RuleError::Sheet("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| RuleError::Sheet(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    // Formula text is kept in a separate range; missing on containers that
    // do not record it.
    let formulas = workbook.worksheet_formula(&sheet_name).ok();

    Ok(collect_rows(&range, formulas.as_ref()))
}

fn collect_rows(range: &Range<Data>, formulas: Option<&Range<String>>) -> Vec<Vec<SheetCell>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<SheetCell>> = Vec::with_capacity(end_row as usize + 1);
    for r in 0..=end_row {
        let mut row: Vec<SheetCell> = Vec::with_capacity(end_col as usize + 1);
        for c in 0..=end_col {
            let formula = formulas
                .and_then(|f| f.get_value((r, c)))
                .filter(|src| !src.is_empty());
            let cell = if let Some(src) = formula {
                SheetCell::Formula(src.clone())
            } else {
                match range.get_value((r, c)) {
                    Some(data) => convert_cell(data),
                    None => SheetCell::Empty,
                }
            };
            row.push(cell);
        }
        while row.last().is_some_and(SheetCell::is_empty) {
            row.pop();
        }
        rows.push(row);
    }

    // Rows past the last populated one carry no information.
    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }
    rows
}

fn convert_cell(data: &Data) -> SheetCell {
    match data {
        Data::Empty => SheetCell::Empty,
        Data::String(s) => SheetCell::Text(s.clone()),
        Data::Float(f) => SheetCell::Number(*f),
        Data::Int(i) => SheetCell::Number(*i as f64),
        Data::Bool(b) => SheetCell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => SheetCell::Text(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => SheetCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => SheetCell::Text(s.clone()),
        Data::DurationIso(s) => SheetCell::Text(s.clone()),
        Data::Error(_) => SheetCell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== SheetFormat Tests ====================

    #[test]
    fn test_format_from_extension_supported() {
        assert_eq!(SheetFormat::from_extension("xls").unwrap(), SheetFormat::Xls);
        assert_eq!(SheetFormat::from_extension("xlsx").unwrap(), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_extension("XLSX").unwrap(), SheetFormat::Xlsx);
    }

    #[test]
    fn test_format_from_extension_rejects_others() {
        let err = SheetFormat::from_extension("csv").unwrap_err();
        assert!(err.to_string().contains("csv"));

        assert!(SheetFormat::from_extension("ods").is_err());
        assert!(SheetFormat::from_extension("").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SheetFormat::from_path("tables/discount.xlsx").unwrap(),
            SheetFormat::Xlsx
        );
        assert!(SheetFormat::from_path("tables/discount.pdf").is_err());
        assert!(SheetFormat::from_path("no_extension").is_err());
    }

    // ==================== SheetCell Tests ====================

    #[test]
    fn test_cell_as_text() {
        assert_eq!(SheetCell::Text("Age".to_string()).as_text(), "Age");
        assert_eq!(SheetCell::Number(30.0).as_text(), "30");
        assert_eq!(SheetCell::Bool(false).as_text(), "false");
        assert_eq!(SheetCell::Formula("A1+B1".to_string()).as_text(), "A1+B1");
        assert_eq!(SheetCell::Empty.as_text(), "");
    }

    #[test]
    fn test_convert_cell_types() {
        assert_eq!(
            convert_cell(&Data::String("x".to_string())),
            SheetCell::Text("x".to_string())
        );
        assert_eq!(convert_cell(&Data::Float(2.5)), SheetCell::Number(2.5));
        assert_eq!(convert_cell(&Data::Int(4)), SheetCell::Number(4.0));
        assert_eq!(convert_cell(&Data::Bool(true)), SheetCell::Bool(true));
        assert_eq!(convert_cell(&Data::Empty), SheetCell::Empty);
    }
}
