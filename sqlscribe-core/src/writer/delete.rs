//! DELETE query assembler

use super::common::where_clause;
use super::SqlWriter;
use crate::Result;

pub(super) fn compose(writer: &SqlWriter) -> Result<String> {
    let mut sql = format!(
        "DELETE FROM {}",
        writer.schema.map_table(&writer.delete_table)
    );
    sql.push_str(&where_clause(&writer.schema, &writer.where_fields));
    Ok(sql)
}
