//! INSERT query assembler

use super::SqlWriter;
use crate::Result;

pub(super) fn compose(writer: &SqlWriter) -> Result<String> {
    let mut sql = format!(
        "INSERT INTO {}({}) VALUES ",
        writer.insert_table,
        writer.insert_columns.join(", ")
    );

    let rows: Vec<String> = writer
        .value_rows
        .iter()
        .map(|row| {
            let rendered: Vec<String> = row.iter().map(|value| value.render()).collect();
            format!("({})", rendered.join(", "))
        })
        .collect();
    sql.push_str(&rows.join(", "));

    Ok(sql)
}
