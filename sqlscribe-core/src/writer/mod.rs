//! The stateful fluent query writer
//!
//! A [`SqlWriter`] owns every accumulated buffer and a small state machine
//! over the active query type. Type-selecting methods (`select`,
//! `insert_into`, `update`, `delete_from`, `upsert`) transition from any
//! state to their target state; when the prior state was not `None`, all
//! buffers are cleared first (a soft reset, not an error). Composition via
//! [`SqlWriter::to_sql`] is a pure read of the current state.

pub mod common;

mod delete;
mod insert;
mod select;
mod update;
mod upsert;

use std::path::Path;

use tracing::trace;

use crate::schema::SchemaMap;
use crate::{Dialect, Error, Result, Value};

pub use common::{
    IntoColumns, IntoCondition, IntoValueRow, JoinKind, JoinSpec, OrderDirection, WhereTriple,
};

use common::FromField;

/// The active query type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryType {
    #[default]
    None,
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
}

/// Dialect-aware SQL statement composer
///
/// One writer is created once and reused across many logical queries; each
/// type-selecting call either starts the first query or discards the previous
/// query's buffers.
///
/// ```
/// use sqlscribe_core::{Dialect, SqlWriter};
///
/// let mut writer = SqlWriter::new(Dialect::MySql);
/// let sql = writer.select(["a", "b"]).from("t").to_sql().unwrap();
/// assert_eq!(sql, "SELECT a, b FROM t");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlWriter {
    pub(crate) dialect: Dialect,
    pub(crate) schema: SchemaMap,
    pub(crate) query_type: QueryType,

    pub(crate) select_fields: Vec<String>,
    pub(crate) from_fields: Vec<FromField>,
    pub(crate) where_fields: Vec<WhereTriple>,
    pub(crate) join_fields: Vec<JoinSpec>,
    pub(crate) order_by_fields: Vec<(String, OrderDirection)>,
    pub(crate) limit_value: Option<u64>,
    pub(crate) offset_value: Option<u64>,
    pub(crate) count_value: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) max_fields: Vec<(String, Option<String>)>,
    pub(crate) min_fields: Vec<(String, Option<String>)>,

    pub(crate) insert_table: String,
    pub(crate) insert_columns: Vec<String>,
    pub(crate) value_rows: Vec<Vec<Value>>,

    pub(crate) update_table: String,
    pub(crate) set_fields: Vec<(String, Value)>,

    pub(crate) delete_table: String,
}

impl SqlWriter {
    /// Create a writer targeting the given dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Change the target dialect; buffers are left untouched
    pub fn set_dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The currently active query type
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    // State machine. Selecting a type while another query is in the buffers
    // discards that query first.
    fn transition(&mut self, target: QueryType) {
        if self.query_type != QueryType::None {
            self.reset_query();
        }
        self.query_type = target;
    }

    /// Clear every buffer and return to the `None` state
    pub fn reset_query(&mut self) -> &mut Self {
        self.select_fields.clear();
        self.from_fields.clear();
        self.where_fields.clear();
        self.join_fields.clear();
        self.order_by_fields.clear();
        self.limit_value = None;
        self.offset_value = None;
        self.count_value = None;
        self.distinct = false;
        self.max_fields.clear();
        self.min_fields.clear();
        self.insert_table.clear();
        self.insert_columns.clear();
        self.value_rows.clear();
        self.update_table.clear();
        self.set_fields.clear();
        self.delete_table.clear();
        self.query_type = QueryType::None;
        self
    }

    /// Clear only the filter triples, leaving the rest of the query intact
    pub fn reset_where(&mut self) -> &mut Self {
        self.where_fields.clear();
        self
    }

    /// Start a SELECT query with the given fields
    ///
    /// Pass `()` to start a select with no fields yet (aggregates or fields
    /// may be appended afterwards).
    pub fn select<C: IntoColumns>(&mut self, fields: C) -> &mut Self {
        self.transition(QueryType::Select);
        self.select_fields.extend(fields.into_columns());
        self
    }

    /// Start a SELECT query with fields qualified by a table name
    pub fn select_table<C: IntoColumns>(&mut self, table: &str, fields: C) -> &mut Self {
        self.transition(QueryType::Select);
        self.select_fields.extend(
            fields
                .into_columns()
                .into_iter()
                .map(|field| format!("{}.{}", table, field)),
        );
        self
    }

    /// Mark the SELECT as DISTINCT; idempotent
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Capture a COUNT expression (`*` renders as `COUNT(*)`)
    pub fn count(&mut self, expression: &str) -> &mut Self {
        self.count_value = Some(expression.to_string());
        self
    }

    /// Append a `MAX(column)` aggregate
    pub fn max(&mut self, column: &str) -> &mut Self {
        self.max_fields.push((column.to_string(), None));
        self
    }

    /// Append a `MAX(column) AS alias` aggregate
    pub fn max_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.max_fields
            .push((column.to_string(), Some(alias.to_string())));
        self
    }

    /// Append a `MIN(column)` aggregate
    pub fn min(&mut self, column: &str) -> &mut Self {
        self.min_fields.push((column.to_string(), None));
        self
    }

    /// Append a `MIN(column) AS alias` aggregate
    pub fn min_as(&mut self, column: &str, alias: &str) -> &mut Self {
        self.min_fields
            .push((column.to_string(), Some(alias.to_string())));
        self
    }

    /// Append one or more unaliased FROM tables
    pub fn from<C: IntoColumns>(&mut self, tables: C) -> &mut Self {
        for table in tables.into_columns() {
            self.from_fields.push(FromField { table, alias: None });
        }
        self
    }

    /// Append one FROM table with an alias
    pub fn from_as(&mut self, table: &str, alias: &str) -> &mut Self {
        self.from_fields.push(FromField {
            table: table.to_string(),
            alias: Some(alias.to_string()),
        });
        self
    }

    /// Append join specs; emission order equals insertion order
    pub fn join<I>(&mut self, joins: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<JoinSpec>,
    {
        self.join_fields.extend(joins.into_iter().map(Into::into));
        self
    }

    /// Append one filter triple; triples are conjoined with AND
    pub fn where_<C: IntoCondition>(&mut self, condition: C) -> &mut Self {
        self.where_fields.push(condition.into_condition());
        self
    }

    /// Append one ordering key
    pub fn order_by(&mut self, column: &str, direction: OrderDirection) -> &mut Self {
        self.order_by_fields
            .push((column.to_string(), direction));
        self
    }

    /// Set the maximum number of rows to return
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit_value = Some(limit);
        self
    }

    /// Set the offset of the first row to return
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset_value = Some(offset);
        self
    }

    /// Start an INSERT query with no declared column list
    pub fn insert_into(&mut self, table: &str) -> &mut Self {
        self.transition(QueryType::Insert);
        self.insert_table = table.to_string();
        self
    }

    /// Start an INSERT query, seeding the column list
    pub fn insert_into_fields<C: IntoColumns>(&mut self, table: &str, fields: C) -> &mut Self {
        self.transition(QueryType::Insert);
        self.insert_table = table.to_string();
        self.insert_columns.extend(fields.into_columns());
        self
    }

    /// Append one VALUES row
    ///
    /// Row arity is not cross-checked against the declared column list.
    pub fn values<R: IntoValueRow>(&mut self, row: R) -> &mut Self {
        self.value_rows.push(row.into_value_row());
        self
    }

    /// Append several VALUES rows
    pub fn values_many<R: IntoValueRow>(&mut self, rows: Vec<R>) -> &mut Self {
        for row in rows {
            self.value_rows.push(row.into_value_row());
        }
        self
    }

    /// Start an UPDATE query on the given table
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.transition(QueryType::Update);
        self.update_table = table.to_string();
        self
    }

    /// Append one SET pair
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.set_fields.push((column.to_string(), value.into()));
        self
    }

    /// Start a DELETE query on the given table
    pub fn delete_from(&mut self, table: &str) -> &mut Self {
        self.transition(QueryType::Delete);
        self.delete_table = table.to_string();
        self
    }

    /// Start an UPSERT query on the given table
    ///
    /// Where triples become the natural-key columns, set pairs the updated
    /// columns. Only defined for the MySQL dialect.
    pub fn upsert(&mut self, table: &str) -> &mut Self {
        self.transition(QueryType::Upsert);
        self.insert_table = table.to_string();
        self
    }

    /// Generate the SQL text for the current state
    ///
    /// A pure read: buffers and query type are unchanged afterwards.
    pub fn to_sql(&self) -> Result<String> {
        trace!(query_type = ?self.query_type, dialect = %self.dialect, "composing query");
        match self.query_type {
            QueryType::None => Err(Error::NoActiveQuery),
            QueryType::Select => select::compose(self),
            QueryType::Insert => insert::compose(self),
            QueryType::Update => update::compose(self),
            QueryType::Delete => delete::compose(self),
            QueryType::Upsert => upsert::compose(self),
        }
    }

    // Schema map surface

    pub fn schema(&self) -> &SchemaMap {
        &self.schema
    }

    /// Register a table name in the alias map
    pub fn register_table(&mut self, table: &str) -> bool {
        self.schema.register_table(table)
    }

    /// Register a column under a registered table
    pub fn register_column(&mut self, table: &str, column: &str) -> bool {
        self.schema.register_column(table, column)
    }

    /// Assign a display alias to a registered table
    pub fn set_table_alias(&mut self, table: &str, alias: &str) -> bool {
        self.schema.set_table_alias(table, alias)
    }

    /// Assign a display alias to a registered column
    pub fn set_column_alias(&mut self, table: &str, column: &str, alias: &str) -> bool {
        self.schema.set_column_alias(table, column, alias)
    }

    /// Populate the alias map from a directive file
    pub fn load_map_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.schema.load_map_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::op;

    fn writer() -> SqlWriter {
        SqlWriter::new(Dialect::MySql)
    }

    #[test]
    fn test_basic_select() {
        let mut w = writer();
        let sql = w.select(["a", "b"]).from("t").to_sql().unwrap();
        assert_eq!(sql, "SELECT a, b FROM t");
    }

    #[test]
    fn test_select_table_qualified_fields() {
        let mut w = writer();
        let sql = w.select_table("t", ["a", "b"]).from("t").to_sql().unwrap();
        assert_eq!(sql, "SELECT t.a, t.b FROM t");
    }

    #[test]
    fn test_select_distinct() {
        let mut w = writer();
        let sql = w.select("a").distinct().from("t").to_sql().unwrap();
        assert_eq!(sql, "SELECT DISTINCT a FROM t");
    }

    #[test]
    fn test_select_count_star() {
        let mut w = writer();
        let sql = w.select(()).count("*").from("t").to_sql().unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM t");
    }

    #[test]
    fn test_select_count_expression_with_fields() {
        let mut w = writer();
        let sql = w.select("a").count("b").from("t").to_sql().unwrap();
        assert_eq!(sql, "SELECT a, COUNT(b) FROM t");
    }

    #[test]
    fn test_select_aggregates() {
        let mut w = writer();
        let sql = w
            .select(())
            .max_as("price", "highest")
            .min("price")
            .from("items")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT MAX(price) AS highest, MIN(price) FROM items");
    }

    #[test]
    fn test_select_requires_fields() {
        let mut w = writer();
        let result = w.select(()).from("t").to_sql();
        assert!(matches!(result, Err(Error::NoSelectFields)));
    }

    #[test]
    fn test_select_requires_from() {
        let mut w = writer();
        let result = w.select("a").to_sql();
        assert!(matches!(result, Err(Error::NoFromFields)));
    }

    #[test]
    fn test_from_alias() {
        let mut w = writer();
        let sql = w.select("n.a").from_as("names", "n").to_sql().unwrap();
        assert_eq!(sql, "SELECT n.a FROM names AS n");
    }

    #[test]
    fn test_select_with_join() {
        let mut w = writer();
        let sql = w
            .select(["u.name", "o.total"])
            .from("users")
            .join([("users", "id", JoinKind::Left, "orders", "user_id")])
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT u.name, o.total FROM users LEFT JOIN orders ON users.id=orders.user_id"
        );
    }

    #[test]
    fn test_select_with_where_and_order() {
        let mut w = writer();
        let sql = w
            .select("a")
            .from("t")
            .where_(("age", op::GTE, 18))
            .where_(("name", "John"))
            .order_by("a", OrderDirection::Desc)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT a FROM t WHERE (age >= 18) AND (name = 'John') ORDER BY a DESC"
        );
    }

    #[test]
    fn test_select_with_limit_mysql() {
        let mut w = writer();
        let sql = w.select("a").from("t").limit(10).to_sql().unwrap();
        assert_eq!(sql, "SELECT a FROM t LIMIT 10 ");
    }

    #[test]
    fn test_select_with_limit_and_offset_mysql() {
        let mut w = writer();
        let sql = w
            .select("a")
            .from("t")
            .limit(10)
            .offset(5)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "SELECT a FROM t LIMIT 5, 10 ");
    }

    #[test]
    fn test_select_offset_without_limit_mysql() {
        let mut w = writer();
        let sql = w.select("a").from("t").offset(5).to_sql().unwrap();
        assert_eq!(sql, format!("SELECT a FROM t LIMIT 5, {} ", u64::MAX));
    }

    #[test]
    fn test_select_top_microsoft() {
        let mut w = SqlWriter::new(Dialect::Microsoft);
        let sql = w.select("a").from("t").limit(10).to_sql().unwrap();
        assert_eq!(sql, "SELECT TOP 10 a FROM t");
    }

    #[test]
    fn test_select_limit_postgres_is_fatal() {
        let mut w = SqlWriter::new(Dialect::Postgres);
        let result = w.select("a").from("t").limit(10).to_sql();
        assert!(matches!(result, Err(Error::UnsupportedLimit { .. })));
    }

    #[test]
    fn test_insert_without_declared_columns() {
        let mut w = writer();
        let sql = w.insert_into("t").values((1, "x")).to_sql().unwrap();
        assert_eq!(sql, "INSERT INTO t() VALUES (1, 'x')");
    }

    #[test]
    fn test_insert_with_declared_columns() {
        let mut w = writer();
        let sql = w
            .insert_into_fields("t", ["n", "s"])
            .values((1, "x"))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO t(n, s) VALUES (1, 'x')");
    }

    #[test]
    fn test_insert_multiple_rows() {
        let mut w = writer();
        let sql = w
            .insert_into_fields("t", ["n", "s"])
            .values_many(vec![(1, "x"), (2, "y")])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO t(n, s) VALUES (1, 'x'), (2, 'y')");
    }

    #[test]
    fn test_insert_bind_placeholders() {
        let mut w = writer();
        let sql = w
            .insert_into_fields("t", ["a", "b", "c"])
            .values([Value::bind("name"), Value::bind(":age"), Value::bind("?x")])
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO t(a, b, c) VALUES (:name, :age, ?x)");
    }

    #[test]
    fn test_update() {
        let mut w = writer();
        let sql = w
            .update("t")
            .set("name", "Jane")
            .set("age", 25)
            .where_(("id", 1))
            .to_sql()
            .unwrap();
        assert_eq!(sql, "UPDATE t SET name = 'Jane', age = 25 WHERE (id = 1)");
    }

    #[test]
    fn test_update_without_set_is_fatal() {
        let mut w = writer();
        let result = w.update("t").where_(("id", 1)).to_sql();
        assert!(matches!(result, Err(Error::NoSetFields)));
    }

    #[test]
    fn test_delete() {
        let mut w = writer();
        let sql = w.delete_from("t").where_(("id", 1)).to_sql().unwrap();
        assert_eq!(sql, "DELETE FROM t WHERE (id = 1)");
    }

    #[test]
    fn test_delete_without_where() {
        let mut w = writer();
        let sql = w.delete_from("t").to_sql().unwrap();
        assert_eq!(sql, "DELETE FROM t");
    }

    #[test]
    fn test_upsert_mysql() {
        let mut w = writer();
        let sql = w
            .upsert("t")
            .set("v", true)
            .where_(("k", "=", 1))
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO t(k, v) VALUES (1, true) ON DUPLICATE KEY UPDATE v = true"
        );
    }

    #[test]
    fn test_upsert_under_postgres_is_fatal() {
        let mut w = SqlWriter::new(Dialect::Postgres);
        let result = w.upsert("t").set("v", true).where_(("k", 1)).to_sql();
        assert!(matches!(result, Err(Error::UnsupportedUpsert { .. })));
    }

    #[test]
    fn test_compose_before_any_query_is_fatal() {
        let w = writer();
        assert!(matches!(w.to_sql(), Err(Error::NoActiveQuery)));
    }

    #[test]
    fn test_type_selection_soft_resets() {
        let mut w = writer();
        w.select("a").from("old_table").where_(("old", 1)).limit(5);
        assert_eq!(w.query_type(), QueryType::Select);

        // Switching type discards every buffer from the previous query.
        let sql = w.delete_from("t").to_sql().unwrap();
        assert_eq!(w.query_type(), QueryType::Delete);
        assert_eq!(sql, "DELETE FROM t");
        assert!(!sql.contains("old"));
    }

    #[test]
    fn test_last_type_selection_wins() {
        let mut w = writer();
        w.insert_into("i").values((1,));
        w.update("u").set("c", 2);
        w.select("a").from("t");
        assert_eq!(w.query_type(), QueryType::Select);
        assert_eq!(w.to_sql().unwrap(), "SELECT a FROM t");
    }

    #[test]
    fn test_reset_query_returns_to_none() {
        let mut w = writer();
        w.select("a").from("t");
        w.reset_query();
        assert_eq!(w.query_type(), QueryType::None);
        assert!(matches!(w.to_sql(), Err(Error::NoActiveQuery)));
    }

    #[test]
    fn test_reset_where_keeps_everything_else() {
        let mut w = writer();
        w.select("a")
            .from("t")
            .where_(("x", 1))
            .order_by("a", OrderDirection::Asc);
        w.reset_where();
        assert_eq!(w.query_type(), QueryType::Select);
        assert_eq!(w.to_sql().unwrap(), "SELECT a FROM t ORDER BY a ASC");
    }

    #[test]
    fn test_refine_where_between_compositions() {
        let mut w = writer();
        w.select("a").from("t").where_(("x", 1));
        let first = w.to_sql().unwrap();
        assert_eq!(first, "SELECT a FROM t WHERE (x = 1)");

        w.reset_where().where_(("x", 2));
        let second = w.to_sql().unwrap();
        assert_eq!(second, "SELECT a FROM t WHERE (x = 2)");
    }

    #[test]
    fn test_to_sql_does_not_mutate() {
        let mut w = writer();
        w.select("a").from("t");
        let first = w.to_sql().unwrap();
        let second = w.to_sql().unwrap();
        assert_eq!(first, second);
        assert_eq!(w.query_type(), QueryType::Select);
    }

    #[test]
    fn test_set_dialect_keeps_buffers() {
        let mut w = writer();
        w.select("a").from("t").limit(3);
        w.set_dialect(Dialect::Microsoft);
        assert_eq!(w.to_sql().unwrap(), "SELECT TOP 3 a FROM t");
    }

    #[test]
    fn test_schema_registration_via_writer() {
        let mut w = writer();
        assert!(w.register_table("t"));
        assert!(w.register_column("t", "c"));
        assert!(w.set_table_alias("t", "T"));
        assert!(w.set_column_alias("t", "c", "C"));
        assert_eq!(w.schema().table_alias("t"), Some("T"));
    }
}
