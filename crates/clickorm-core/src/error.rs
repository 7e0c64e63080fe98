//! Error types for statement compilation.
//!
//! Quoting, type rendering and type parsing are total and never produce
//! these errors. They are reserved for statements that would otherwise be
//! rendered as malformed SQL.

use thiserror::Error;

/// Caller-contract violations detected while compiling a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A CREATE TABLE or INSERT was requested without any columns.
    #[error("table '{table}' has no columns")]
    NoColumns {
        /// Table the statement targets.
        table: String,
    },

    /// A row INSERT was requested without any rows.
    #[error("insert into '{table}' has no rows")]
    NoRows {
        /// Table the statement targets.
        table: String,
    },

    /// A row does not have one value per declared column.
    #[error("insert into '{table}': row {row} has {found} values, expected {expected}")]
    RowArity {
        /// Table the statement targets.
        table: String,
        /// Number of declared columns.
        expected: usize,
        /// Number of values in the offending row.
        found: usize,
        /// Zero-based index of the offending row.
        row: usize,
    },

    /// An INSERT ... SELECT was compiled without any source tables.
    #[error("insert-select has no sources")]
    NoSources,

    /// An INSERT ... SELECT was compiled without any column mapping.
    #[error("insert-select has no column mapping")]
    NoMapping,

    /// An engine setting has a value that has no SQL literal, such as a
    /// NaN or infinite float.
    #[error("table '{table}': setting '{key}' has no valid value")]
    InvalidSetting {
        /// Table the statement targets.
        table: String,
        /// Offending setting key.
        key: String,
    },

    /// A table with the same name is already registered.
    #[error("table '{0}' is already registered")]
    DuplicateTable(String),

    /// No table with this name is registered.
    #[error("table '{0}' is not registered")]
    UnknownTable(String),
}

/// Result type alias for statement compilation.
pub type Result<T> = std::result::Result<T, Error>;
