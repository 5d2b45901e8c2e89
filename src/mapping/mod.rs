//! Column maps and the checks that guard an import.
//!
//! Two independent checks must pass before any data row is read:
//!
//! 1. the map against the record type ([`check_map_against_type`]), before
//!    the storage is opened;
//! 2. the map against the sheet's header row ([`check_map_against_headers`]).

mod column_map;
mod validate;

pub use column_map::ColumnMap;
pub use validate::{
    check_map_against_headers, check_map_against_type, validate_map_against_headers,
    validate_map_against_type, HeaderMismatch, MappingMismatch,
};
