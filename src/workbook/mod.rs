//! XLSX workbook decoding.
//!
//! Decodes the first worksheet of an Office Open XML workbook into an
//! in-memory [`Sheet`] of typed cells. Only reading is supported.
//!
//! # Example
//!
//! ```no_run
//! use sheetbind::storage::FileStorage;
//! use sheetbind::workbook::Workbook;
//!
//! let workbook = Workbook::open(&FileStorage::new("people.xlsx"))?;
//! let sheet = workbook.first_sheet()?;
//!
//! for row in sheet.rows() {
//!     println!("row {}: {} cells", row.index(), row.cells().len());
//! }
//! # Ok::<(), sheetbind::Error>(())
//! ```

mod model;
mod parser;
mod shared_strings;

pub use model::{CellKind, CellValue, Sheet, SheetCell, SheetRow};
pub use parser::{load_first_sheet, parse_cell_ref, parse_sheet_rows, Workbook};
pub use shared_strings::SharedStrings;
