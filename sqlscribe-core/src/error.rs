//! Error types for Sqlscribe

use thiserror::Error;

use crate::Dialect;

/// The main error type for Sqlscribe operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a map file
    #[error("Map file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Limit/offset requested for a dialect without a limit clause shape
    #[error("LIMIT/OFFSET composition is not implemented for the {dialect} dialect")]
    UnsupportedLimit { dialect: Dialect },

    /// Upsert requested while a non-MySQL dialect is active
    #[error("Upsert is only implemented for the MySQL dialect, active dialect is {dialect}")]
    UnsupportedUpsert { dialect: Dialect },

    /// SELECT composition with no select fields, count expression or aggregates
    #[error("Select query has no select fields")]
    NoSelectFields,

    /// SELECT composition with an empty FROM list
    #[error("Select query has no from fields")]
    NoFromFields,

    /// UPDATE composition with an empty SET list
    #[error("Update query has no set fields")]
    NoSetFields,

    /// Composition requested before any query type was selected
    #[error("No query has been started, nothing to compose")]
    NoActiveQuery,

    /// Malformed directive line in a map file
    #[error("Map file syntax error on line {line}: {message}")]
    MapSyntax { line: usize, message: String },

    /// Map file directive names a table that was never registered
    #[error("Map file references unknown table '{table}' on line {line}")]
    UnknownTable { line: usize, table: String },

    /// Map file directive names a column that was never registered
    #[error("Map file references unknown column '{table}.{column}' on line {line}")]
    UnknownColumn {
        line: usize,
        table: String,
        column: String,
    },
}

/// The §7-style taxonomy a variant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unsupported dialect configuration
    Configuration,
    /// A composition precondition was violated
    Precondition,
    /// Malformed map-file input
    Syntax,
    /// Map-file directive referencing an unregistered name
    Reference,
    /// Filesystem failure while loading
    Io,
    /// Internal invariant violation
    Internal,
}

/// Convenience Result type for Sqlscribe operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a map-file syntax error
    pub fn map_syntax(line: usize, message: impl Into<String>) -> Self {
        Self::MapSyntax {
            line,
            message: message.into(),
        }
    }

    /// Create an unknown-table reference error
    pub fn unknown_table(line: usize, table: impl Into<String>) -> Self {
        Self::UnknownTable {
            line,
            table: table.into(),
        }
    }

    /// Create an unknown-column reference error
    pub fn unknown_column(line: usize, table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            line,
            table: table.into(),
            column: column.into(),
        }
    }

    /// Stable machine-checkable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "E_SQLSCRIBE_IO",
            Error::UnsupportedLimit { .. } => "E_SQLSCRIBE_UNSUPPORTEDLIMIT",
            Error::UnsupportedUpsert { .. } => "E_SQLSCRIBE_UNSUPPORTEDUPSERT",
            Error::NoSelectFields => "E_SQLSCRIBE_NOSELECTFIELDS",
            Error::NoFromFields => "E_SQLSCRIBE_NOFROMFIELDS",
            Error::NoSetFields => "E_SQLSCRIBE_NOSETFIELDS",
            Error::NoActiveQuery => "E_SQLSCRIBE_NOACTIVEQUERY",
            Error::MapSyntax { .. } => "E_SQLSCRIBE_SYNTAXERROR",
            Error::UnknownTable { .. } => "E_SQLSCRIBE_INVALIDTABLENAME",
            Error::UnknownColumn { .. } => "E_SQLSCRIBE_INVALIDCOLUMNNAME",
        }
    }

    /// Which part of the error taxonomy this variant belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::UnsupportedLimit { .. } => ErrorKind::Configuration,
            Error::UnsupportedUpsert { .. }
            | Error::NoSelectFields
            | Error::NoFromFields
            | Error::NoSetFields => ErrorKind::Precondition,
            Error::NoActiveQuery => ErrorKind::Internal,
            Error::MapSyntax { .. } => ErrorKind::Syntax,
            Error::UnknownTable { .. } | Error::UnknownColumn { .. } => ErrorKind::Reference,
        }
    }
}
