//! Storage capability: where workbook bytes come from.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// A readable location holding one workbook.
///
/// Implementations only need to name the location and open a fresh reader
/// over its bytes. The importer reads the reader to the end and drops it
/// before decoding anything.
pub trait Storage {
    /// Human-readable identifier of the location (a path, a URL, a key).
    fn location(&self) -> String;

    /// Open the location for reading.
    fn open(&self) -> std::io::Result<Box<dyn Read + '_>>;
}

/// Read the whole storage into memory.
///
/// The reader returned by [`Storage::open`] is dropped before this returns,
/// on the error path as well.
pub fn read_all(storage: &dyn Storage) -> Result<Vec<u8>> {
    let storage_error = |source| Error::Storage {
        location: storage.location(),
        source,
    };

    let mut reader = storage.open().map_err(storage_error)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(storage_error)?;

    tracing::debug!(location = %storage.location(), bytes = data.len(), "read workbook bytes");
    Ok(data)
}

/// Workbook stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage for the given path. The file is not touched until opened.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Workbook held in memory, e.g. an upload body.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    name: String,
    data: Vec<u8>,
}

impl MemoryStorage {
    /// Create an in-memory storage with a display name.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Storage for MemoryStorage {
    fn location(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }
}
