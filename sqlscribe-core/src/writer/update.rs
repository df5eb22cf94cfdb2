//! UPDATE query assembler

use super::common::{set_clause, where_clause};
use super::SqlWriter;
use crate::Result;

pub(super) fn compose(writer: &SqlWriter) -> Result<String> {
    let mut sql = format!("UPDATE {} ", writer.update_table);
    sql.push_str(&set_clause(&writer.set_fields)?);
    sql.push_str(&where_clause(&writer.schema, &writer.where_fields));
    Ok(sql)
}
