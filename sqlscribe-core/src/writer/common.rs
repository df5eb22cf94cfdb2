//! Common types, conversion traits and clause composers shared across query types

use serde::{Deserialize, Serialize};

use crate::schema::SchemaMap;
use crate::{Error, IntoOperator, Operator, Result, Value};

/// Join flavor for a [`JoinSpec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
    Full,
}

impl JoinKind {
    /// The SQL keyword pair for this join kind
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// Sort direction for an order-by key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// One join: an equality between two qualified columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub left_table: String,
    pub left_column: String,
    pub kind: JoinKind,
    pub right_table: String,
    pub right_column: String,
}

impl JoinSpec {
    pub fn new(
        left_table: &str,
        left_column: &str,
        kind: JoinKind,
        right_table: &str,
        right_column: &str,
    ) -> Self {
        Self {
            left_table: left_table.to_string(),
            left_column: left_column.to_string(),
            kind,
            right_table: right_table.to_string(),
            right_column: right_column.to_string(),
        }
    }
}

impl From<(&str, &str, JoinKind, &str, &str)> for JoinSpec {
    fn from(spec: (&str, &str, JoinKind, &str, &str)) -> Self {
        JoinSpec::new(spec.0, spec.1, spec.2, spec.3, spec.4)
    }
}

/// One filter: column, whitelisted operator, value
#[derive(Debug, Clone, PartialEq)]
pub struct WhereTriple {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

/// A from-clause entry, alias optional
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FromField {
    pub table: String,
    pub alias: Option<String>,
}

/// Trait for conditions that can be used in WHERE clauses
pub trait IntoCondition {
    fn into_condition(self) -> WhereTriple;
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> WhereTriple {
        WhereTriple {
            column: self.0.to_string(),
            operator: Operator::EQ,
            value: self.1.into(),
        }
    }
}

// Explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> WhereTriple {
        WhereTriple {
            column: self.0.to_string(),
            operator: self.1.into_operator(),
            value: self.2.into(),
        }
    }
}

impl IntoCondition for WhereTriple {
    fn into_condition(self) -> WhereTriple {
        self
    }
}

/// Trait for types that can be converted to column lists
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

// Empty column list, for a bare type-selecting call
impl IntoColumns for () {
    fn into_columns(self) -> Vec<String> {
        Vec::new()
    }
}

/// Trait for types that can be converted to one VALUES row
pub trait IntoValueRow {
    fn into_value_row(self) -> Vec<Value>;
}

impl IntoValueRow for Vec<Value> {
    fn into_value_row(self) -> Vec<Value> {
        self
    }
}

impl<const N: usize> IntoValueRow for [Value; N] {
    fn into_value_row(self) -> Vec<Value> {
        self.into_iter().collect()
    }
}

impl<A> IntoValueRow for (A,)
where
    A: Into<Value>,
{
    fn into_value_row(self) -> Vec<Value> {
        vec![self.0.into()]
    }
}

impl<A, B> IntoValueRow for (A, B)
where
    A: Into<Value>,
    B: Into<Value>,
{
    fn into_value_row(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into()]
    }
}

impl<A, B, C> IntoValueRow for (A, B, C)
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
{
    fn into_value_row(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<A, B, C, D> IntoValueRow for (A, B, C, D)
where
    A: Into<Value>,
    B: Into<Value>,
    C: Into<Value>,
    D: Into<Value>,
{
    fn into_value_row(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}

/// Compose the FROM clause: comma-joined `table[ AS alias]` pairs
pub(crate) fn from_clause(map: &SchemaMap, fields: &[FromField]) -> String {
    let mut clause = String::from(" FROM ");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            clause.push_str(", ");
        }
        clause.push_str(map.map_table(&field.table));
        if let Some(alias) = &field.alias {
            clause.push_str(" AS ");
            clause.push_str(alias);
        }
    }
    clause
}

/// Compose the JOIN clause in insertion order
pub(crate) fn join_clause(map: &SchemaMap, joins: &[JoinSpec]) -> String {
    let mut clause = String::new();
    for join in joins {
        clause.push(' ');
        clause.push_str(join.kind.keyword());
        clause.push(' ');
        clause.push_str(map.map_table(&join.right_table));
        clause.push_str(" ON ");
        clause.push_str(map.map_table(&join.left_table));
        clause.push('.');
        clause.push_str(map.map_column(&join.left_column));
        clause.push('=');
        clause.push_str(map.map_table(&join.right_table));
        clause.push('.');
        clause.push_str(map.map_column(&join.right_column));
    }
    clause
}

/// Compose the WHERE clause: AND-joined parenthesized triples
///
/// Empty when there are no triples, so callers can append unconditionally.
pub(crate) fn where_clause(map: &SchemaMap, triples: &[WhereTriple]) -> String {
    if triples.is_empty() {
        return String::new();
    }
    let mut clause = String::from(" WHERE ");
    for (i, triple) in triples.iter().enumerate() {
        if i > 0 {
            clause.push_str(" AND ");
        }
        clause.push('(');
        clause.push_str(map.map_column(&triple.column));
        clause.push(' ');
        clause.push_str(triple.operator.as_str());
        clause.push(' ');
        clause.push_str(&triple.value.render());
        clause.push(')');
    }
    clause
}

/// Compose the ORDER BY clause in insertion order
pub(crate) fn order_by_clause(map: &SchemaMap, keys: &[(String, OrderDirection)]) -> String {
    if keys.is_empty() {
        return String::new();
    }
    let mut clause = String::from(" ORDER BY ");
    for (i, (column, direction)) in keys.iter().enumerate() {
        if i > 0 {
            clause.push_str(", ");
        }
        clause.push_str(map.map_column(column));
        clause.push(' ');
        clause.push_str(direction.as_str());
    }
    clause
}

/// Compose the SET clause, fatal when no pairs are present
pub(crate) fn set_clause(pairs: &[(String, Value)]) -> Result<String> {
    if pairs.is_empty() {
        return Err(Error::NoSetFields);
    }
    let parts: Vec<String> = pairs
        .iter()
        .map(|(column, value)| format!("{} = {}", column, value.render()))
        .collect();
    Ok(format!("SET {}", parts.join(", ")))
}
