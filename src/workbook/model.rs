//! In-memory sheet model: rows of typed cells.

use serde::{Deserialize, Serialize};

/// Kind of value stored in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Text,
    Numeric,
    Boolean,
    Blank,
    Error,
    Formula,
    Unrecognized,
}

impl CellKind {
    /// Lower-case name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            CellKind::Text => "text",
            CellKind::Numeric => "numeric",
            CellKind::Boolean => "boolean",
            CellKind::Blank => "blank",
            CellKind::Error => "error",
            CellKind::Formula => "formula",
            CellKind::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded value of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Shared, inline or plain string.
    Text(String),
    /// Any number; dates are serial numbers too.
    Numeric(f64),
    Boolean(bool),
    /// Cell present (e.g. styled) but without a value.
    Blank,
    /// Error literal such as `#DIV/0!`.
    Error(String),
    /// Formula text with the cached result, if the file has one.
    Formula {
        formula: String,
        cached: Option<String>,
    },
    /// A cell type this decoder does not interpret, with its raw value.
    Unrecognized { cell_type: String, raw: String },
}

impl CellValue {
    /// The kind tag of this value.
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Text(_) => CellKind::Text,
            CellValue::Numeric(_) => CellKind::Numeric,
            CellValue::Boolean(_) => CellKind::Boolean,
            CellValue::Blank => CellKind::Blank,
            CellValue::Error(_) => CellKind::Error,
            CellValue::Formula { .. } => CellKind::Formula,
            CellValue::Unrecognized { .. } => CellKind::Unrecognized,
        }
    }
}

/// A cell with its zero-based column index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetCell {
    column: u32,
    value: CellValue,
}

impl SheetCell {
    pub fn new(column: u32, value: CellValue) -> Self {
        Self { column, value }
    }

    /// Create a text cell.
    pub fn text(column: u32, text: impl Into<String>) -> Self {
        Self::new(column, CellValue::Text(text.into()))
    }

    /// Create a numeric cell.
    pub fn number(column: u32, number: f64) -> Self {
        Self::new(column, CellValue::Numeric(number))
    }

    /// Create a boolean cell.
    pub fn boolean(column: u32, value: bool) -> Self {
        Self::new(column, CellValue::Boolean(value))
    }

    /// Zero-based column index.
    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn kind(&self) -> CellKind {
        self.value.kind()
    }

    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a numeric cell.
    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            CellValue::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean cell.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            CellValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

/// A physical row: its zero-based index and the cells it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    index: u32,
    cells: Vec<SheetCell>,
}

impl SheetRow {
    pub fn new(index: u32, cells: Vec<SheetCell>) -> Self {
        Self { index, cells }
    }

    /// Zero-based physical row index (`r` attribute minus one).
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Cells in left-to-right order as stored.
    pub fn cells(&self) -> &[SheetCell] {
        &self.cells
    }

    /// Cell at a column index, if present.
    pub fn cell(&self, column: u32) -> Option<&SheetCell> {
        self.cells.iter().find(|c| c.column == column)
    }

    /// Whether no cell carries a text, numeric or boolean value.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|c| {
            matches!(
                c.kind(),
                CellKind::Text | CellKind::Numeric | CellKind::Boolean
            )
        })
    }
}

/// A worksheet loaded fully into memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    rows: Vec<SheetRow>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<SheetRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Sheet name from the workbook.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All physically present rows in file order.
    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    /// Row with the given physical index, if present.
    pub fn row(&self, index: u32) -> Option<&SheetRow> {
        self.rows.iter().find(|r| r.index == index)
    }

    /// Number of physically present rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(SheetCell::text(0, "a").kind(), CellKind::Text);
        assert_eq!(SheetCell::number(0, 1.5).kind(), CellKind::Numeric);
        assert_eq!(SheetCell::boolean(0, true).kind(), CellKind::Boolean);
        assert_eq!(SheetCell::new(0, CellValue::Blank).kind(), CellKind::Blank);
        assert_eq!(
            CellValue::Formula {
                formula: "A1+1".into(),
                cached: Some("2".into())
            }
            .kind(),
            CellKind::Formula
        );
        assert_eq!(CellKind::Unrecognized.to_string(), "unrecognized");
    }

    #[test]
    fn test_accessors() {
        let cell = SheetCell::number(2, 30.0);
        assert_eq!(cell.column(), 2);
        assert_eq!(cell.as_number(), Some(30.0));
        assert_eq!(cell.as_text(), None);
        assert_eq!(cell.as_bool(), None);
    }

    #[test]
    fn test_row_lookup_by_physical_index() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![
                SheetRow::new(0, vec![SheetCell::text(0, "Name")]),
                SheetRow::new(4, vec![SheetCell::text(0, "Alice")]),
            ],
        );
        assert_eq!(sheet.row_count(), 2);
        assert!(sheet.row(1).is_none());
        assert_eq!(sheet.row(4).unwrap().cell(0).unwrap().as_text(), Some("Alice"));
    }

    #[test]
    fn test_row_emptiness_ignores_blank_and_error() {
        let row = SheetRow::new(
            3,
            vec![
                SheetCell::new(0, CellValue::Blank),
                SheetCell::new(1, CellValue::Error("#N/A".into())),
            ],
        );
        assert!(row.is_empty());
        assert!(!SheetRow::new(3, vec![SheetCell::boolean(0, false)]).is_empty());
    }
}
