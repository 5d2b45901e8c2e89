//! Row materialization: sheet rows into records.

use crate::error::{Error, Result};
use crate::mapping::ColumnMap;
use crate::options::{Coercion, ImportOptions};
use crate::record::{BindingTable, FieldValue, Record};
use crate::storage::Storage;
use crate::workbook::{self, Sheet, SheetRow};
use std::collections::HashMap;

/// Binds rows of one sheet to records of type `R`.
///
/// Built once per import: the column-index lookup and the binding table
/// are shared by every row.
pub struct RowBinder<'m, R> {
    columns: HashMap<u32, &'m str>,
    bindings: BindingTable<R>,
    coercion: Coercion,
}

impl<'m, R: Record> RowBinder<'m, R> {
    pub fn new(map: &'m ColumnMap, coercion: Coercion) -> Self {
        let mut columns = HashMap::with_capacity(map.len());
        for (name, index) in map.iter() {
            columns.entry(index).or_insert(name);
        }
        Self {
            columns,
            bindings: BindingTable::new(),
            coercion,
        }
    }

    /// Materialize one row.
    ///
    /// Cells in unmapped columns are ignored. Blank, error, formula and
    /// unrecognized cells leave their field at its zero value.
    pub fn bind(&self, row: &SheetRow) -> Result<R> {
        let mut record = R::default();

        for cell in row.cells() {
            let Some(&column) = self.columns.get(&cell.column()) else {
                tracing::trace!(row = row.index(), column = cell.column(), "cell in unmapped column");
                continue;
            };

            let binding = self.bindings.get(column).ok_or_else(|| Error::FieldBinding {
                column: column.to_string(),
                row: row.index(),
            })?;

            let Some(value) = FieldValue::from_cell(cell) else {
                continue;
            };

            binding
                .set(&mut record, value, self.coercion)
                .map_err(|e| Error::CellType {
                    row: row.index(),
                    column: cell.column(),
                    field: binding.name().to_string(),
                    expected: e.expected,
                    found: e.found,
                })?;
        }

        record.set_row_number(row.index());
        Ok(record)
    }
}

/// Materialize a single row with strict coercion.
pub fn bind_row<R: Record>(row: &SheetRow, map: &ColumnMap) -> Result<R> {
    RowBinder::new(map, Coercion::Strict).bind(row)
}

/// Materialize every data row of an in-memory sheet.
///
/// Physical row 0 is the header row and is always skipped.
pub fn materialize_sheet<R: Record>(
    sheet: &Sheet,
    map: &ColumnMap,
    options: &ImportOptions,
) -> Result<Vec<R>> {
    let binder = RowBinder::<R>::new(map, options.coercion);
    let limit = options.row_limit.unwrap_or(usize::MAX);

    sheet
        .rows()
        .iter()
        .filter(|row| row.index() != 0)
        .filter(|row| !(options.skip_empty_rows && row.is_empty()))
        .take(limit)
        .map(|row| binder.bind(row))
        .collect()
}

/// Load the first sheet behind `storage` and materialize its data rows.
pub fn materialize<R: Record>(storage: &dyn Storage, map: &ColumnMap) -> Result<Vec<R>> {
    let sheet = workbook::load_first_sheet(storage)?;
    materialize_sheet(&sheet, map, &ImportOptions::default())
}
