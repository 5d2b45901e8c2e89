//! Error types for the sheetbind library.

use crate::import::Stage;
use crate::mapping::{HeaderMismatch, MappingMismatch};
use std::io;
use thiserror::Error;

/// Result type alias for sheetbind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing a spreadsheet.
#[derive(Error, Debug)]
pub enum Error {
    /// The column map does not match the record type's bound fields.
    #[error("Column map does not match record fields: {0}")]
    MappingShape(MappingMismatch),

    /// The sheet's header row does not match the column map.
    #[error("Header row does not match column map: {0}")]
    HeaderShape(HeaderMismatch),

    /// A mapped column has no field binding on the record type.
    #[error("No field bound to column '{column}' (row {row})")]
    FieldBinding { column: String, row: u32 },

    /// A cell value could not be coerced into the field's type.
    #[error("Row {row}, column {column}: field '{field}' expects {expected}, found {found}")]
    CellType {
        row: u32,
        column: u32,
        field: String,
        expected: &'static str,
        found: String,
    },

    /// Two column map keys collide once lower-cased.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// The storage could not be opened or read.
    #[error("Cannot read storage '{location}': {source}")]
    Storage {
        location: String,
        #[source]
        source: io::Error,
    },

    /// I/O error outside of storage access.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not a recognizable workbook.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// An import step was called out of order.
    #[error("Import step requires stage {expected:?}, but import is at {actual:?}")]
    Stage { expected: Stage, actual: Stage },

    /// The import was already rejected by an earlier step.
    #[error("Import was rejected by an earlier step")]
    Rejected,

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
