//! Record contract: the typed rows a sheet is imported into.
//!
//! A record type declares two disjoint sets of fields:
//!
//! - the intrinsic row number, set by the importer from the row's physical
//!   index ([`Record::set_row_number`]);
//! - the bound fields, each filled from the column of the same name through
//!   a [`FieldBinding`] setter.
//!
//! The [`sheet_record!`](crate::sheet_record) macro writes both from a field
//! list, so every binding refers to a field the compiler has checked.
//!
//! ```
//! use sheetbind::sheet_record;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     row: u32,
//!     name: String,
//!     age: f64,
//! }
//!
//! sheet_record!(Person { row: row, fields: [name, age] });
//! ```

use crate::options::Coercion;
use crate::workbook::{CellValue, SheetCell};
use std::collections::{BTreeSet, HashMap};

/// A cell value that can be bound to a field.
///
/// Blank, error, formula and unrecognized cells never produce one: their
/// fields keep the zero value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

impl<'a> FieldValue<'a> {
    /// Bindable value of a cell, if its kind carries one.
    pub fn from_cell(cell: &'a SheetCell) -> Option<Self> {
        match cell.value() {
            CellValue::Text(s) => Some(FieldValue::Text(s)),
            CellValue::Numeric(n) => Some(FieldValue::Number(*n)),
            CellValue::Boolean(b) => Some(FieldValue::Bool(*b)),
            _ => None,
        }
    }

    /// Short description used in type mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            FieldValue::Text(s) => format!("text '{}'", s),
            FieldValue::Number(n) => format!("number {}", n),
            FieldValue::Bool(b) => format!("boolean {}", b),
        }
    }
}

/// A value that does not fit the field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    pub expected: &'static str,
    pub found: String,
}

impl CoerceError {
    fn new<T: FromCell>(value: FieldValue<'_>) -> Self {
        Self {
            expected: T::EXPECTED,
            found: value.describe(),
        }
    }
}

/// Field types that can be filled from a cell.
pub trait FromCell: Sized {
    /// Type name used in mismatch errors.
    const EXPECTED: &'static str;

    fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError>;
}

/// Render a number the way a spreadsheet displays a general-format cell.
fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl FromCell for String {
    const EXPECTED: &'static str = "text";

    fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError> {
        match (value, coercion) {
            (FieldValue::Text(s), _) => Ok(s.to_string()),
            (FieldValue::Number(n), Coercion::Lenient) => Ok(number_text(n)),
            (FieldValue::Bool(b), Coercion::Lenient) => {
                Ok(if b { "TRUE" } else { "FALSE" }.to_string())
            }
            _ => Err(CoerceError::new::<Self>(value)),
        }
    }
}

impl FromCell for f64 {
    const EXPECTED: &'static str = "number";

    fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError> {
        match (value, coercion) {
            (FieldValue::Number(n), _) => Ok(n),
            (FieldValue::Text(s), Coercion::Lenient) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| CoerceError::new::<Self>(value)),
            (FieldValue::Bool(b), Coercion::Lenient) => Ok(if b { 1.0 } else { 0.0 }),
            _ => Err(CoerceError::new::<Self>(value)),
        }
    }
}

impl FromCell for f32 {
    const EXPECTED: &'static str = "number";

    fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError> {
        let number = f64::from_cell(value, coercion)? as f32;
        if !number.is_finite() {
            return Err(CoerceError::new::<Self>(value));
        }
        Ok(number)
    }
}

macro_rules! integer_from_cell {
    ($($int:ty),*) => {
        $(
            impl FromCell for $int {
                const EXPECTED: &'static str = concat!("integer (", stringify!($int), ")");

                fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError> {
                    let number = match (value, coercion) {
                        (FieldValue::Number(n), _) => n,
                        (FieldValue::Text(s), Coercion::Lenient) => s
                            .trim()
                            .parse::<f64>()
                            .map_err(|_| CoerceError::new::<Self>(value))?,
                        _ => return Err(CoerceError::new::<Self>(value)),
                    };

                    if number.fract() != 0.0
                        || number < <$int>::MIN as f64
                        || number >= <$int>::MAX as f64 + 1.0
                    {
                        return Err(CoerceError::new::<Self>(value));
                    }
                    Ok(number as $int)
                }
            }
        )*
    };
}

integer_from_cell!(i64, i32, u32);

impl FromCell for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError> {
        match (value, coercion) {
            (FieldValue::Bool(b), _) => Ok(b),
            (FieldValue::Text(s), Coercion::Lenient) => {
                parse_bool(s).ok_or_else(|| CoerceError::new::<Self>(value))
            }
            (FieldValue::Number(n), Coercion::Lenient) => Ok(n != 0.0),
            _ => Err(CoerceError::new::<Self>(value)),
        }
    }
}

impl<T: FromCell> FromCell for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_cell(value: FieldValue<'_>, coercion: Coercion) -> Result<Self, CoerceError> {
        T::from_cell(value, coercion).map(Some)
    }
}

/// Setter that coerces a cell value into one field of `R`.
pub type Setter<R> = for<'a> fn(&mut R, FieldValue<'a>, Coercion) -> Result<(), CoerceError>;

/// A bound field: its declared name and its setter.
pub struct FieldBinding<R> {
    name: &'static str,
    setter: Setter<R>,
}

impl<R> FieldBinding<R> {
    /// Create a binding. A raw identifier prefix (`r#`) is not part of the name.
    pub fn new(name: &'static str, setter: Setter<R>) -> Self {
        Self {
            name: name.trim_start_matches("r#"),
            setter,
        }
    }

    /// Field name in its declared casing.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Coerce `value` and store it in the field.
    pub fn set(
        &self,
        record: &mut R,
        value: FieldValue<'_>,
        coercion: Coercion,
    ) -> Result<(), CoerceError> {
        (self.setter)(record, value, coercion)
    }
}

impl<R> std::fmt::Debug for FieldBinding<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .finish()
    }
}

/// A type that sheet rows are materialized into.
pub trait Record: Default {
    /// Bound fields, one entry per spreadsheet column.
    fn bindings() -> Vec<FieldBinding<Self>>;

    /// Store the physical row index.
    fn set_row_number(&mut self, row: u32);

    /// The physical row index this record came from.
    fn row_number(&self) -> u32;
}

/// Lower-cased names of the bound fields of `R`.
pub fn bound_field_names<R: Record>() -> BTreeSet<String> {
    R::bindings()
        .iter()
        .map(|b| b.name().to_lowercase())
        .collect()
}

/// Bindings of `R` indexed by lower-cased field name.
pub struct BindingTable<R> {
    by_name: HashMap<String, FieldBinding<R>>,
}

impl<R: Record> BindingTable<R> {
    /// Build the table for `R`.
    pub fn new() -> Self {
        let by_name = R::bindings()
            .into_iter()
            .map(|b| (b.name().to_lowercase(), b))
            .collect();
        Self { by_name }
    }
}

impl<R: Record> Default for BindingTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> BindingTable<R> {
    /// Binding for a lower-cased column name.
    pub fn get(&self, column: &str) -> Option<&FieldBinding<R>> {
        self.by_name.get(column)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Implement [`Record`] for a struct from its row-number field and the list
/// of fields bound to columns.
///
/// Every bound field's type must implement [`FromCell`].
#[macro_export]
macro_rules! sheet_record {
    ($record:ty { row: $row:ident, fields: [$($field:ident),* $(,)?] $(,)? }) => {
        impl $crate::Record for $record {
            fn bindings() -> ::std::vec::Vec<$crate::FieldBinding<Self>> {
                ::std::vec![
                    $(
                        $crate::FieldBinding::<Self>::new(
                            ::std::stringify!($field),
                            |record: &mut Self, value, coercion| {
                                record.$field = $crate::FromCell::from_cell(value, coercion)?;
                                ::std::result::Result::Ok(())
                            },
                        ),
                    )*
                ]
            }

            fn set_row_number(&mut self, row: u32) {
                self.$row = row;
            }

            fn row_number(&self) -> u32 {
                self.$row
            }
        }
    };
}
