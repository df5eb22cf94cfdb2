//! Sqlscribe Core - a dialect-aware SQL statement composer
//!
//! This crate builds SQL query text from fluent calls without ever connecting
//! to a database. A [`SqlWriter`] accumulates typed buffers (select fields,
//! filter triples, join specs and so on), and [`SqlWriter::to_sql`] composes
//! them into one SQL string for the configured [`Dialect`].
//!
//! The composer emits literal text verbatim: it does not escape string
//! values, validate against a schema, or parse SQL back. Use bind
//! placeholders ([`Value::bind`]) for anything untrusted.

pub mod dialect;
pub mod error;
pub mod operator;
pub mod schema;
pub mod value;
pub mod writer;

// Re-export main types
pub use dialect::Dialect;
pub use error::{Error, ErrorKind, Result};
pub use operator::{op, IntoOperator, Operator};
pub use schema::SchemaMap;
pub use value::Value;
pub use writer::{
    IntoColumns, IntoCondition, IntoValueRow, JoinKind, JoinSpec, OrderDirection, QueryType,
    SqlWriter, WhereTriple,
};

/// Create a writer targeting the given dialect
pub fn writer(dialect: Dialect) -> SqlWriter {
    SqlWriter::new(dialect)
}
