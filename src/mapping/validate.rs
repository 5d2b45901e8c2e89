//! Pre-flight checks of a column map against a record type and a header row.

use super::ColumnMap;
use crate::error::{Error, Result};
use crate::record::{bound_field_names, Record};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Why a column map does not fit a record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingMismatch {
    /// Number of bound fields on the record type
    pub field_count: usize,
    /// Number of entries in the column map
    pub column_count: usize,
    /// Bound fields (lower-cased) with no column
    pub missing_fields: Vec<String>,
    /// Columns that name no bound field
    pub unknown_columns: Vec<String>,
    /// Column indices claimed by more than one name
    pub duplicate_indices: Vec<u32>,
}

impl fmt::Display for MappingMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bound fields, {} mapped columns",
            self.field_count, self.column_count
        )?;
        if !self.missing_fields.is_empty() {
            write!(f, "; unmapped fields: {}", self.missing_fields.join(", "))?;
        }
        if !self.unknown_columns.is_empty() {
            write!(f, "; unknown columns: {}", self.unknown_columns.join(", "))?;
        }
        if !self.duplicate_indices.is_empty() {
            let indices: Vec<String> = self.duplicate_indices.iter().map(u32::to_string).collect();
            write!(f, "; indices mapped twice: {}", indices.join(", "))?;
        }
        Ok(())
    }
}

/// Why a header row does not fit a column map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMismatch {
    /// Number of textual headers read
    pub header_count: usize,
    /// Number of entries in the column map
    pub column_count: usize,
    /// Headers (as read) that are not mapped
    pub unmapped_headers: Vec<String>,
    /// Mapped columns with no header
    pub missing_headers: Vec<String>,
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} headers, {} mapped columns",
            self.header_count, self.column_count
        )?;
        if !self.unmapped_headers.is_empty() {
            write!(f, "; unmapped headers: {}", self.unmapped_headers.join(", "))?;
        }
        if !self.missing_headers.is_empty() {
            write!(f, "; columns without header: {}", self.missing_headers.join(", "))?;
        }
        Ok(())
    }
}

/// Check a column map against the bound fields of `R`.
///
/// The field set and the key set must be equal, and no column index may be
/// mapped twice. Touches no storage.
pub fn check_map_against_type<R: Record>(map: &ColumnMap) -> Result<()> {
    let fields = bound_field_names::<R>();

    let missing_fields: Vec<String> = fields
        .iter()
        .filter(|name| !map.contains(name))
        .cloned()
        .collect();
    let unknown_columns: Vec<String> = map
        .names()
        .filter(|name| !fields.contains(*name))
        .map(String::from)
        .collect();

    let mut by_index: BTreeMap<u32, usize> = BTreeMap::new();
    for (_, index) in map.iter() {
        *by_index.entry(index).or_default() += 1;
    }
    let duplicate_indices: Vec<u32> = by_index
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(index, _)| index)
        .collect();

    if fields.len() == map.len()
        && missing_fields.is_empty()
        && unknown_columns.is_empty()
        && duplicate_indices.is_empty()
    {
        return Ok(());
    }

    Err(Error::MappingShape(MappingMismatch {
        field_count: fields.len(),
        column_count: map.len(),
        missing_fields,
        unknown_columns,
        duplicate_indices,
    }))
}

/// Check a header row against a column map.
///
/// Cardinality and name set must match; order is not compared.
pub fn check_map_against_headers(map: &ColumnMap, headers: &[String]) -> Result<()> {
    let unmapped_headers: Vec<String> = headers
        .iter()
        .filter(|h| !map.contains(h))
        .cloned()
        .collect();

    let seen: BTreeSet<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let missing_headers: Vec<String> = map
        .names()
        .filter(|name| !seen.contains(*name))
        .map(String::from)
        .collect();

    if headers.len() == map.len() && unmapped_headers.is_empty() && missing_headers.is_empty() {
        return Ok(());
    }

    Err(Error::HeaderShape(HeaderMismatch {
        header_count: headers.len(),
        column_count: map.len(),
        unmapped_headers,
        missing_headers,
    }))
}

/// Whether a column map fits the bound fields of `R`.
pub fn validate_map_against_type<R: Record>(map: &ColumnMap) -> bool {
    check_map_against_type::<R>(map).is_ok()
}

/// Whether a header row fits a column map.
pub fn validate_map_against_headers(map: &ColumnMap, headers: &[String]) -> bool {
    check_map_against_headers(map, headers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet_record;

    #[derive(Debug, Default)]
    struct Person {
        row: u32,
        name: String,
        age: f64,
    }

    sheet_record!(Person { row: row, fields: [name, age] });

    #[derive(Debug, Default)]
    struct NoFields {
        row: u32,
    }

    sheet_record!(NoFields { row: row, fields: [] });

    fn map(pairs: &[(&str, u32)]) -> ColumnMap {
        ColumnMap::from_pairs(pairs.iter().copied()).unwrap()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_matches_type() {
        assert!(validate_map_against_type::<Person>(&map(&[("name", 0), ("age", 1)])));
        assert!(validate_map_against_type::<Person>(&map(&[("Age", 0), ("NAME", 1)])));
    }

    #[test]
    fn test_map_cardinality_mismatch() {
        let err = check_map_against_type::<Person>(&map(&[("name", 0)])).unwrap_err();
        match err {
            Error::MappingShape(m) => {
                assert_eq!(m.field_count, 2);
                assert_eq!(m.column_count, 1);
                assert_eq!(m.missing_fields, vec!["age".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map_renamed_column() {
        let err =
            check_map_against_type::<Person>(&map(&[("name", 0), ("years", 1)])).unwrap_err();
        match err {
            Error::MappingShape(m) => {
                assert_eq!(m.missing_fields, vec!["age".to_string()]);
                assert_eq!(m.unknown_columns, vec!["years".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map_duplicate_index_rejected() {
        let err = check_map_against_type::<Person>(&map(&[("name", 0), ("age", 0)])).unwrap_err();
        match err {
            Error::MappingShape(m) => assert_eq!(m.duplicate_indices, vec![0]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_map_and_no_fields() {
        assert!(validate_map_against_type::<NoFields>(&ColumnMap::new()));
        assert!(!validate_map_against_type::<NoFields>(&map(&[("name", 0)])));
        assert!(validate_map_against_headers(&ColumnMap::new(), &[]));
        assert!(!validate_map_against_headers(&ColumnMap::new(), &headers(&["Name"])));
    }

    #[test]
    fn test_headers_match_case_insensitively_in_any_order() {
        let m = map(&[("name", 0), ("age", 1)]);
        assert!(validate_map_against_headers(&m, &headers(&["Name", "Age"])));
        assert!(validate_map_against_headers(&m, &headers(&["AGE", "name"])));
    }

    #[test]
    fn test_headers_cardinality_mismatch() {
        let m = map(&[("name", 0), ("age", 1)]);
        let err = check_map_against_headers(&m, &headers(&["Name"])).unwrap_err();
        match err {
            Error::HeaderShape(h) => {
                assert_eq!(h.header_count, 1);
                assert_eq!(h.column_count, 2);
                assert_eq!(h.missing_headers, vec!["age".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_headers_unknown_label() {
        let m = map(&[("name", 0), ("age", 1)]);
        let err = check_map_against_headers(&m, &headers(&["Name", "Years"])).unwrap_err();
        match err {
            Error::HeaderShape(h) => {
                assert_eq!(h.unmapped_headers, vec!["Years".to_string()]);
                assert_eq!(
                    h.to_string(),
                    "2 headers, 2 mapped columns; unmapped headers: Years; columns without header: age"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_header_is_not_the_same_name_set() {
        let m = map(&[("name", 0), ("age", 1)]);
        assert!(!validate_map_against_headers(&m, &headers(&["Name", "name"])));
    }
}
