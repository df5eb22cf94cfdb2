//! SELECT query assembler

use super::common::{from_clause, join_clause, order_by_clause, where_clause};
use super::SqlWriter;
use crate::{Error, Result};

pub(super) fn compose(writer: &SqlWriter) -> Result<String> {
    if writer.select_fields.is_empty()
        && writer.count_value.is_none()
        && writer.max_fields.is_empty()
        && writer.min_fields.is_empty()
    {
        return Err(Error::NoSelectFields);
    }
    if writer.from_fields.is_empty() {
        return Err(Error::NoFromFields);
    }

    let mut sql = select_clause(writer);
    sql.push_str(&from_clause(&writer.schema, &writer.from_fields));
    sql.push_str(&join_clause(&writer.schema, &writer.join_fields));
    sql.push_str(&where_clause(&writer.schema, &writer.where_fields));
    sql.push_str(&order_by_clause(&writer.schema, &writer.order_by_fields));

    let limit = writer
        .dialect
        .limit_offset_clause(writer.limit_value, writer.offset_value)?;
    if !limit.is_empty() {
        sql.push(' ');
        sql.push_str(&limit);
    }

    Ok(sql)
}

/// The `SELECT ...` item list: plain fields, then COUNT, MAX and MIN
fn select_clause(writer: &SqlWriter) -> String {
    let mut clause = String::from("SELECT ");

    if writer.dialect.bounds_via_top() {
        if let Some(limit) = writer.limit_value {
            clause.push_str("TOP ");
            clause.push_str(&limit.to_string());
            clause.push(' ');
        }
    }

    if writer.distinct {
        clause.push_str("DISTINCT ");
    }

    let mut items: Vec<String> = writer.select_fields.clone();

    if let Some(expression) = &writer.count_value {
        if expression == "*" {
            items.push("COUNT(*)".to_string());
        } else {
            items.push(format!("COUNT({})", expression));
        }
    }

    for (column, alias) in &writer.max_fields {
        match alias {
            Some(alias) => items.push(format!("MAX({}) AS {}", column, alias)),
            None => items.push(format!("MAX({})", column)),
        }
    }

    for (column, alias) in &writer.min_fields {
        match alias {
            Some(alias) => items.push(format!("MIN({}) AS {}", column, alias)),
            None => items.push(format!("MIN({})", column)),
        }
    }

    clause.push_str(&items.join(", "));
    clause
}
