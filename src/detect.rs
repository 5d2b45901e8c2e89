//! Workbook format detection.
//!
//! Only SpreadsheetML packages (.xlsx/.xlsm) can be imported. Everything
//! else is rejected here, before any worksheet is decoded, with an error
//! that names what was found instead.

use crate::container::Package;
use crate::error::{Error, Result};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE compound file magic, used by legacy .xls and by encrypted OOXML.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the macro-enabled (.xlsm) workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Content types of other OOXML documents, for a precise rejection message.
const OTHER_CONTENT_TYPES: [(&str, &str); 2] = [
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        "Word document (.docx)",
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        "PowerPoint presentation (.pptx)",
    ),
];

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}

/// Reject bytes that cannot be a workbook package at all.
pub fn check_workbook_bytes(data: &[u8]) -> Result<()> {
    if data.starts_with(&OLE_MAGIC) {
        return Err(Error::UnsupportedFormat(
            "legacy binary (.xls) or encrypted workbook".to_string(),
        ));
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Check that an opened package declares a spreadsheet workbook.
pub fn check_workbook_package(package: &Package) -> Result<()> {
    let content_types = match package.read_xml("[Content_Types].xml") {
        Ok(xml) => xml,
        // Some generators omit content types; fall back to the part layout
        Err(Error::MissingComponent(_)) => {
            return if package.exists("xl/workbook.xml") {
                Ok(())
            } else {
                Err(Error::UnknownFormat)
            };
        }
        Err(e) => return Err(e),
    };

    if content_types.contains(XLSX_CONTENT_TYPE) || content_types.contains(XLSM_CONTENT_TYPE) {
        return Ok(());
    }

    for (content_type, name) in OTHER_CONTENT_TYPES {
        if content_types.contains(content_type) {
            return Err(Error::UnsupportedFormat(name.to_string()));
        }
    }

    if package.exists("xl/workbook.xml") {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}
