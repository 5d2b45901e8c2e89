//! # sheetbind
//!
//! Validated import of XLSX spreadsheet rows into strongly-typed records.
//!
//! A caller declares which column feeds which field ([`ColumnMap`]). Before
//! any data row is read, the map is checked against the record type and
//! against the sheet's header row; a renamed, missing or extra column fails
//! the import instead of filling the wrong field.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetbind::{sheet_record, ColumnMap, FileStorage, ParsedSheet};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     row: u32,
//!     name: String,
//!     age: f64,
//! }
//!
//! sheet_record!(Person { row: row, fields: [name, age] });
//!
//! let map = ColumnMap::from_pairs([("name", 0), ("age", 1)])?;
//! let people = ParsedSheet::<Person>::load(&map, &FileStorage::new("people.xlsx"))?;
//! println!("{} people", people.len());
//! # Ok::<(), sheetbind::Error>(())
//! ```
//!
//! ## Stages
//!
//! ```no_run
//! use sheetbind::{sheet_record, ColumnMap, Import, MemoryStorage, Stage};
//!
//! # #[derive(Debug, Default)]
//! # struct Person { row: u32, name: String, age: f64 }
//! # sheet_record!(Person { row: row, fields: [name, age] });
//! let map = ColumnMap::from_json_str(r#"{"name": 0, "age": 1}"#)?;
//! let storage = MemoryStorage::new("upload.xlsx", std::fs::read("upload.xlsx")?);
//!
//! let mut import = Import::<Person>::new(&map, &storage);
//! import.validate_map()?;
//! import.read_headers()?;
//! println!("headers: {:?}", import.headers());
//! import.validate_headers()?;
//! import.materialize()?;
//! assert_eq!(import.stage(), Stage::RowsParsed);
//! let people = import.finish()?;
//! # Ok::<(), sheetbind::Error>(())
//! ```

pub mod container;
pub mod detect;
pub mod error;
pub mod header;
pub mod import;
pub mod mapping;
pub mod materialize;
pub mod options;
pub mod record;
pub mod storage;
pub mod workbook;

// Re-exports
pub use error::{Error, Result};
pub use header::{headers_of, read_headers};
pub use import::{Import, JsonFormat, ParsedSheet, Stage};
pub use mapping::{
    check_map_against_headers, check_map_against_type, validate_map_against_headers,
    validate_map_against_type, ColumnMap, HeaderMismatch, MappingMismatch,
};
pub use materialize::{bind_row, materialize, materialize_sheet, RowBinder};
pub use options::{Coercion, ImportOptions};
pub use record::{bound_field_names, BindingTable, CoerceError, FieldBinding, FieldValue, FromCell, Record};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use workbook::{CellKind, CellValue, Sheet, SheetCell, SheetRow, Workbook};
