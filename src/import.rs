//! Staged import of a sheet into a parsed record collection.
//!
//! An import moves through fixed stages:
//!
//! ```text
//! Created -> MapValidated -> HeadersRead -> HeadersValidated -> RowsParsed
//!     \___________\_______________\______________\_____________> Rejected
//! ```
//!
//! Each step is its own method so it can be driven and inspected alone;
//! [`Import::run`] drives all of them. A failing step moves the import to
//! [`Stage::Rejected`], after which every step returns [`Error::Rejected`].

use crate::error::{Error, Result};
use crate::header;
use crate::mapping::{self, ColumnMap};
use crate::materialize;
use crate::options::ImportOptions;
use crate::record::Record;
use crate::storage::Storage;
use crate::workbook::{self, Sheet};
use serde::Serialize;

/// Stage of an [`Import`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    MapValidated,
    HeadersRead,
    HeadersValidated,
    RowsParsed,
    Rejected,
}

/// One import of one storage with one column map.
pub struct Import<'a, R> {
    map: &'a ColumnMap,
    storage: &'a dyn Storage,
    options: ImportOptions,
    stage: Stage,
    sheet: Option<Sheet>,
    headers: Vec<String>,
    records: Vec<R>,
}

impl<'a, R: Record> Import<'a, R> {
    /// Start an import with default options. Nothing is read yet.
    pub fn new(map: &'a ColumnMap, storage: &'a dyn Storage) -> Self {
        Self::with_options(map, storage, ImportOptions::default())
    }

    /// Start an import with options.
    pub fn with_options(
        map: &'a ColumnMap,
        storage: &'a dyn Storage,
        options: ImportOptions,
    ) -> Self {
        Self {
            map,
            storage,
            options,
            stage: Stage::Created,
            sheet: None,
            headers: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Headers read so far (empty before [`Stage::HeadersRead`]).
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Check the column map against the record type. No I/O.
    pub fn validate_map(&mut self) -> Result<()> {
        self.enter(Stage::Created)?;
        let map = self.map;
        self.advance(mapping::check_map_against_type::<R>(map), Stage::MapValidated)
    }

    /// Load the first sheet and read its header row.
    pub fn read_headers(&mut self) -> Result<()> {
        self.enter(Stage::MapValidated)?;
        let loaded = workbook::load_first_sheet(self.storage);
        let sheet = self.advance(loaded, Stage::HeadersRead)?;

        self.headers = header::headers_of(&sheet);
        self.sheet = Some(sheet);
        tracing::debug!(
            location = %self.storage.location(),
            headers = ?self.headers,
            "read header row"
        );
        Ok(())
    }

    /// Check the header row against the column map.
    pub fn validate_headers(&mut self) -> Result<()> {
        self.enter(Stage::HeadersRead)?;
        let checked = mapping::check_map_against_headers(self.map, &self.headers);
        self.advance(checked, Stage::HeadersValidated)
    }

    /// Materialize every data row.
    pub fn materialize(&mut self) -> Result<()> {
        self.enter(Stage::HeadersValidated)?;
        let sheet = self.sheet.take().unwrap_or_default();
        let parsed = materialize::materialize_sheet::<R>(&sheet, self.map, &self.options);
        self.records = self.advance(parsed, Stage::RowsParsed)?;
        Ok(())
    }

    /// Hand over the parsed collection.
    pub fn finish(self) -> Result<ParsedSheet<R>> {
        if self.stage == Stage::Rejected {
            return Err(Error::Rejected);
        }
        if self.stage != Stage::RowsParsed {
            return Err(Error::Stage {
                expected: Stage::RowsParsed,
                actual: self.stage,
            });
        }

        tracing::info!(
            location = %self.storage.location(),
            records = self.records.len(),
            "import complete"
        );
        Ok(ParsedSheet {
            headers: self.headers,
            records: self.records,
        })
    }

    /// Run every remaining step and hand over the parsed collection.
    pub fn run(mut self) -> Result<ParsedSheet<R>> {
        self.validate_map()?;
        self.read_headers()?;
        self.validate_headers()?;
        self.materialize()?;
        self.finish()
    }

    fn enter(&self, expected: Stage) -> Result<()> {
        match self.stage {
            Stage::Rejected => Err(Error::Rejected),
            actual if actual != expected => Err(Error::Stage { expected, actual }),
            _ => Ok(()),
        }
    }

    fn advance<T>(&mut self, result: Result<T>, next: Stage) -> Result<T> {
        match result {
            Ok(value) => {
                tracing::debug!(from = ?self.stage, to = ?next, "import stage");
                self.stage = next;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(
                    location = %self.storage.location(),
                    stage = ?self.stage,
                    error = %e,
                    "import rejected"
                );
                self.stage = Stage::Rejected;
                self.sheet = None;
                self.records.clear();
                Err(e)
            }
        }
    }
}

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Records parsed from a sheet, in sheet row order.
///
/// Built only by a successful import and never modified afterwards; a
/// changed spreadsheet needs a new import.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet<R> {
    headers: Vec<String>,
    records: Vec<R>,
}

impl<R: Record> ParsedSheet<R> {
    /// Import the first sheet behind `storage` with default options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sheetbind::{sheet_record, ColumnMap, FileStorage, ParsedSheet};
    ///
    /// #[derive(Debug, Default)]
    /// struct Person {
    ///     row: u32,
    ///     name: String,
    ///     age: f64,
    /// }
    ///
    /// sheet_record!(Person { row: row, fields: [name, age] });
    ///
    /// let map = ColumnMap::from_pairs([("name", 0), ("age", 1)])?;
    /// let people = ParsedSheet::<Person>::load(&map, &FileStorage::new("people.xlsx"))?;
    ///
    /// for person in &people {
    ///     println!("row {}: {} ({})", person.row, person.name, person.age);
    /// }
    /// # Ok::<(), sheetbind::Error>(())
    /// ```
    pub fn load(map: &ColumnMap, storage: &dyn Storage) -> Result<Self> {
        Import::new(map, storage).run()
    }

    /// Import the first sheet behind `storage` with options.
    pub fn load_with_options(
        map: &ColumnMap,
        storage: &dyn Storage,
        options: ImportOptions,
    ) -> Result<Self> {
        Import::with_options(map, storage, options).run()
    }
}

impl<R> ParsedSheet<R> {
    /// Header labels as read from the sheet.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Parsed records.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Iterate over records.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take ownership of the records.
    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R: Serialize> ParsedSheet<R> {
    /// Serialize the records as a JSON array.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Compact => serde_json::to_string(&self.records)?,
            JsonFormat::Pretty => serde_json::to_string_pretty(&self.records)?,
        };
        Ok(json)
    }
}

impl<'s, R> IntoIterator for &'s ParsedSheet<R> {
    type Item = &'s R;
    type IntoIter = std::slice::Iter<'s, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R> IntoIterator for ParsedSheet<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
