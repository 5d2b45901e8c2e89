//! Column map: lower-cased column name to zero-based column index.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Declares which sheet column feeds which record field.
///
/// Keys are stored lower-cased, so `"Name"` and `"name"` are the same
/// column. The map is never inferred from a sheet; it is validated against
/// the record type and the header row before any data row is read.
///
/// In JSON a column map is a plain object:
///
/// ```
/// use sheetbind::ColumnMap;
///
/// let map = ColumnMap::from_json_str(r#"{ "Name": 0, "age": 1 }"#)?;
/// assert_eq!(map.get("name"), Some(0));
/// assert_eq!(map.get("AGE"), Some(1));
/// # Ok::<(), sheetbind::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct ColumnMap {
    columns: BTreeMap<String, u32>,
}

impl ColumnMap {
    /// Create an empty column map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from (name, index) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for (name, index) in pairs {
            map.insert(name.as_ref(), index)?;
        }
        Ok(map)
    }

    /// Parse a map from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a map from a JSON reader (e.g. a mapping file).
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize the map as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.columns)?)
    }

    /// Add a column. Fails if the lower-cased name is already mapped.
    pub fn insert(&mut self, name: &str, index: u32) -> Result<()> {
        let key = name.to_lowercase();
        if self.columns.contains_key(&key) {
            return Err(Error::DuplicateColumn(key));
        }
        self.columns.insert(key, index);
        Ok(())
    }

    /// Column index for a name, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.columns.get(&name.to_lowercase()).copied()
    }

    /// Whether a name is mapped, compared case-insensitively.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(&name.to_lowercase())
    }

    /// Name mapped to a column index.
    ///
    /// A validated map is injective. On a degenerate map this returns the
    /// alphabetically first name.
    pub fn column_name(&self, index: u32) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, i)| **i == index)
            .map(|(name, _)| name.as_str())
    }

    /// Mapped names, lower-cased, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// (name, index) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.columns.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<BTreeMap<String, u32>> for ColumnMap {
    type Error = Error;

    fn try_from(columns: BTreeMap<String, u32>) -> Result<Self> {
        Self::from_pairs(columns)
    }
}

impl From<ColumnMap> for BTreeMap<String, u32> {
    fn from(map: ColumnMap) -> Self {
        map.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_lower_cased() {
        let map = ColumnMap::from_pairs([("Name", 0), ("AGE", 1)]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("name"), Some(0));
        assert_eq!(map.get("Age"), Some(1));
        assert!(map.contains("NAME"));
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["age", "name"]);
    }

    #[test]
    fn test_duplicate_after_lower_casing() {
        let err = ColumnMap::from_pairs([("name", 0), ("Name", 1)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(ref k) if k == "name"));
    }

    #[test]
    fn test_column_name_lookup() {
        let map = ColumnMap::from_pairs([("name", 0), ("age", 3)]).unwrap();
        assert_eq!(map.column_name(3), Some("age"));
        assert_eq!(map.column_name(1), None);
    }

    #[test]
    fn test_json_round_trip() {
        let map = ColumnMap::from_json_str(r#"{"Name": 0, "age": 1}"#).unwrap();
        assert_eq!(map.get("name"), Some(0));
        assert_eq!(map.to_json().unwrap(), r#"{"age":1,"name":0}"#);

        let reloaded = ColumnMap::from_json_reader(map.to_json().unwrap().as_bytes()).unwrap();
        assert_eq!(reloaded, map);
    }

    #[test]
    fn test_json_rejects_bad_maps() {
        assert!(matches!(
            ColumnMap::from_json_str(r#"{"Name": 0, "NAME": 1}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            ColumnMap::from_json_str(r#"{"name": -1}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            ColumnMap::from_json_str(r#"["name"]"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_empty_map() {
        let map = ColumnMap::new();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }
}
