//! Workbook decoding: first sheet of a SpreadsheetML package.

use crate::container::Package;
use crate::detect;
use crate::error::{Error, Result};
use crate::storage::{self, Storage};
use quick_xml::events::{BytesStart, Event};

use super::model::{CellValue, Sheet, SheetCell, SheetRow};
use super::shared_strings::SharedStrings;

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// A decoded workbook package.
///
/// Opening reads the whole storage into memory and releases it; afterwards
/// the workbook only works on its in-memory package.
#[derive(Debug)]
pub struct Workbook {
    package: Package,
    shared_strings: SharedStrings,
    sheets: Vec<SheetInfo>,
}

impl Workbook {
    /// Open the workbook behind a storage.
    pub fn open(storage: &dyn Storage) -> Result<Self> {
        let data = storage::read_all(storage)?;
        Self::from_bytes(data)
    }

    /// Create a workbook from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        detect::check_workbook_bytes(&data)?;
        let package = Package::from_bytes(data)?;
        detect::check_workbook_package(&package)?;

        let shared_strings = match package.read_xml("xl/sharedStrings.xml") {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(Error::MissingComponent(_)) => SharedStrings::default(),
            Err(e) => return Err(e),
        };

        let sheets = parse_workbook(&package.read_xml(WORKBOOK_PART)?)?;

        Ok(Self {
            package,
            shared_strings,
            sheets,
        })
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Decode the first sheet of the workbook.
    pub fn first_sheet(&self) -> Result<Sheet> {
        let info = self
            .sheets
            .first()
            .ok_or_else(|| Error::MissingComponent("worksheet".to_string()))?;

        let rels = self.package.read_relationships(WORKBOOK_PART)?;
        let target = rels
            .get(&info.rel_id)
            .ok_or_else(|| Error::MissingComponent(format!("relationship {}", info.rel_id)))?;
        let sheet_path = Package::resolve_path(WORKBOOK_PART, &target.target);

        let xml = self.package.read_xml(&sheet_path)?;
        let rows = parse_sheet_rows(&xml, &self.shared_strings)?;

        tracing::debug!(sheet = %info.name, path = %sheet_path, rows = rows.len(), "decoded worksheet");
        Ok(Sheet::new(info.name.clone(), rows))
    }
}

/// Load the first sheet behind a storage.
pub fn load_first_sheet(storage: &dyn Storage) -> Result<Sheet> {
    Workbook::open(storage)?.first_sheet()
}

/// Parse workbook.xml for sheet entries, in order.
fn parse_workbook(xml: &str) -> Result<Vec<SheetInfo>> {
    let mut sheets = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = String::new();
                let mut rel_id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = String::from_utf8_lossy(&attr.value).to_string(),
                        b"r:id" => rel_id = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if !name.is_empty() {
                    sheets.push(SheetInfo { name, rel_id });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Split a cell reference like `AB12` into zero-based (column, row).
pub fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let letters = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    if letters == 0 {
        return None;
    }

    let mut column: u32 = 0;
    for b in reference[..letters].bytes() {
        let digit = u32::from(b.to_ascii_uppercase() - b'A') + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }

    let row: u32 = reference[letters..].parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column - 1, row - 1))
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Cell being accumulated while its children are read.
#[derive(Default)]
struct PendingCell {
    column: u32,
    cell_type: Option<String>,
    value: Option<String>,
    formula: Option<String>,
}

impl PendingCell {
    fn from_start(e: &BytesStart<'_>, next_column: u32) -> Self {
        let column = attr_value(e, b"r")
            .and_then(|r| parse_cell_ref(&r))
            .map(|(col, _)| col)
            .unwrap_or(next_column);
        Self {
            column,
            cell_type: attr_value(e, b"t"),
            ..Default::default()
        }
    }

    fn resolve(self, shared_strings: &SharedStrings, row: u32) -> Result<SheetCell> {
        let column = self.column;

        if let Some(formula) = self.formula {
            return Ok(SheetCell::new(
                column,
                CellValue::Formula {
                    formula,
                    cached: self.value,
                },
            ));
        }

        let Some(raw) = self.value else {
            return Ok(SheetCell::new(column, CellValue::Blank));
        };

        let is_text = matches!(self.cell_type.as_deref(), Some("inlineStr" | "str"));
        if raw.trim().is_empty() && !is_text {
            return Ok(SheetCell::new(column, CellValue::Blank));
        }

        let value = match self.cell_type.as_deref() {
            Some("s") => {
                let text = raw
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| shared_strings.get(idx))
                    .ok_or_else(|| {
                        Error::InvalidData(format!(
                            "row {}, column {}: bad shared string index '{}'",
                            row, column, raw
                        ))
                    })?;
                CellValue::Text(text.to_string())
            }
            Some("inlineStr") | Some("str") => CellValue::Text(raw),
            Some("b") => CellValue::Boolean(raw.trim() == "1"),
            Some("e") => CellValue::Error(raw),
            None | Some("n") => {
                let number = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| {
                        Error::InvalidData(format!(
                            "row {}, column {}: '{}' is not a number",
                            row, column, raw
                        ))
                    })?;
                CellValue::Numeric(number)
            }
            Some(other) => CellValue::Unrecognized {
                cell_type: other.to_string(),
                raw,
            },
        };

        Ok(SheetCell::new(column, value))
    }
}

/// Where text events currently go.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Formula,
}

/// Decode worksheet XML into rows of typed cells.
pub fn parse_sheet_rows(xml: &str, shared_strings: &SharedStrings) -> Result<Vec<SheetRow>> {
    let mut rows = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut row: Option<(u32, Vec<SheetCell>)> = None;
    let mut cell: Option<PendingCell> = None;
    let mut target = TextTarget::None;
    let mut in_phonetic = false;
    let mut next_row: u32 = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = Some((row_index(e, next_row), Vec::new()));
                }
                b"c" => {
                    if let Some((_, cells)) = &row {
                        let next_column = cells.last().map(|c| c.column() + 1).unwrap_or(0);
                        cell = Some(PendingCell::from_start(e, next_column));
                    }
                }
                b"v" | b"t" if cell.is_some() && !in_phonetic => {
                    target = TextTarget::Value;
                    if let Some(pending) = cell.as_mut() {
                        pending.value.get_or_insert_with(String::new);
                    }
                }
                b"f" if cell.is_some() => {
                    target = TextTarget::Formula;
                    if let Some(pending) = cell.as_mut() {
                        pending.formula.get_or_insert_with(String::new);
                    }
                }
                // Phonetic runs of inline strings are not cell text
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    let index = row_index(e, next_row);
                    rows.push(SheetRow::new(index, Vec::new()));
                    next_row = index + 1;
                }
                b"c" => {
                    if let Some((index, cells)) = row.as_mut() {
                        let next_column = cells.last().map(|c| c.column() + 1).unwrap_or(0);
                        let pending = PendingCell::from_start(e, next_column);
                        cells.push(pending.resolve(shared_strings, *index)?);
                    }
                }
                // Shared formula reference without text
                b"f" => {
                    if let Some(pending) = cell.as_mut() {
                        let shared = attr_value(e, b"si").unwrap_or_default();
                        pending.formula.get_or_insert(format!("shared:{}", shared));
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if target != TextTarget::None => {
                let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                if let Some(pending) = cell.as_mut() {
                    let slot = match target {
                        TextTarget::Formula => pending.formula.get_or_insert_with(String::new),
                        _ => pending.value.get_or_insert_with(String::new),
                    };
                    slot.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    if let Some((index, cells)) = row.take() {
                        rows.push(SheetRow::new(index, cells));
                        next_row = index + 1;
                    }
                }
                b"c" => {
                    if let (Some(pending), Some((index, cells))) = (cell.take(), row.as_mut()) {
                        cells.push(pending.resolve(shared_strings, *index)?);
                    }
                    target = TextTarget::None;
                }
                b"v" | b"t" | b"f" => target = TextTarget::None,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

fn row_index(e: &BytesStart<'_>, next_row: u32) -> u32 {
    attr_value(e, b"r")
        .and_then(|r| r.trim().parse::<u32>().ok())
        .and_then(|r| r.checked_sub(1))
        .unwrap_or(next_row)
}
