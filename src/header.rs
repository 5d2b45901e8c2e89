//! Header row reading.

use crate::error::Result;
use crate::storage::Storage;
use crate::workbook::{self, Sheet};

/// Textual labels of physical row 0, whitespace removed, left to right.
///
/// Non-text cells are skipped, so a header row holding a number yields
/// fewer labels than it has columns and fails the header check later.
pub fn headers_of(sheet: &Sheet) -> Vec<String> {
    let Some(row) = sheet.row(0) else {
        return Vec::new();
    };

    row.cells()
        .iter()
        .filter_map(|cell| cell.as_text())
        .map(|text| text.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Open the first sheet behind `storage` and read its header row.
pub fn read_headers(storage: &dyn Storage) -> Result<Vec<String>> {
    let sheet = workbook::load_first_sheet(storage)?;
    Ok(headers_of(&sheet))
}
