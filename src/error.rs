//! Error types for the mapping core.
//!
//! The reader, template loader, engine, and writer report failures through
//! [`MapError`]; mapping documents report through [`MappingError`]. Both are
//! plain `thiserror` enums so the run adapter can classify a failure without
//! string matching.

use thiserror::Error;

/// Errors raised while parsing input, loading the template, or rendering output.
#[derive(Debug, Error)]
pub enum MapError {
    /// A data line carries more fields than the header declares.
    #[error("line {line}: found {found} field(s) but the header declares {expected}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Template header and type row disagree on the number of columns.
    #[error("template header has {header} column(s) but the type row has {type_row}")]
    TemplateShape { header: usize, type_row: usize },

    /// Template has a header line but no type row.
    #[error("template is missing its type row")]
    MissingTypeRow,

    /// Template contains no header line at all.
    #[error("template is empty")]
    EmptyTemplate,

    #[error("input is not valid {encoding} text")]
    Decode { encoding: &'static str },

    #[error("output contains characters that cannot be encoded as {encoding}")]
    Encode { encoding: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors raised while building or loading a mapping table.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("output column '{column}' is mapped more than once")]
    DuplicateColumn { column: String },

    #[error("rule for '{column}' sets both `source` and `literal`")]
    AmbiguousRule { column: String },

    #[error("rule for '{column}' sets neither `source` nor `literal`")]
    EmptyRule { column: String },

    #[error("mapping rule has an empty output column name")]
    BlankColumn,

    #[error("failed to parse mapping document: {0}")]
    Parse(#[from] serde_yaml::Error),
}
