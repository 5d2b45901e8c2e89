//! Import options configuration.

/// How strictly cell values must match field types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Coercion {
    /// Text cells only fill text fields, numeric cells number fields,
    /// boolean cells boolean fields
    #[default]
    Strict,
    /// Parse text into numbers and booleans, render numbers and booleans as text
    Lenient,
}

/// Options for importing a sheet.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Cell-to-field conversion policy
    pub coercion: Coercion,

    /// Drop data rows without any text, numeric or boolean cell
    pub skip_empty_rows: bool,

    /// Stop after this many data rows (None = all rows)
    pub row_limit: Option<usize>,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coercion policy.
    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Enable or disable skipping of empty data rows.
    pub fn with_skip_empty_rows(mut self, skip: bool) -> Self {
        self.skip_empty_rows = skip;
        self
    }

    /// Limit the number of data rows materialized.
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }
}
