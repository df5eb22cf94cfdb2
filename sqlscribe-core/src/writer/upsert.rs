//! UPSERT query assembler (MySQL `ON DUPLICATE KEY UPDATE`)
//!
//! The where triples name the natural-key columns and the set pairs the
//! updated columns; both contribute to the insert column/value lists, while
//! only the set pairs appear after `ON DUPLICATE KEY UPDATE`.

use super::SqlWriter;
use crate::{Dialect, Error, Result};

pub(super) fn compose(writer: &SqlWriter) -> Result<String> {
    if writer.dialect != Dialect::MySql {
        return Err(Error::UnsupportedUpsert {
            dialect: writer.dialect,
        });
    }

    let mut columns: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    for triple in &writer.where_fields {
        columns.push(writer.schema.map_column(&triple.column).to_string());
        values.push(triple.value.render());
    }
    for (column, value) in &writer.set_fields {
        columns.push(writer.schema.map_column(column).to_string());
        values.push(value.render());
    }

    let assignments: Vec<String> = writer
        .set_fields
        .iter()
        .map(|(column, value)| {
            format!("{} = {}", writer.schema.map_column(column), value.render())
        })
        .collect();

    Ok(format!(
        "INSERT INTO {}({}) VALUES ({}) ON DUPLICATE KEY UPDATE {}",
        writer.insert_table,
        columns.join(", "),
        values.join(", "),
        assignments.join(", ")
    ))
}
