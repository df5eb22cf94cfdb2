//! SQL comparison operator whitelist

use std::fmt::{self, Display};

/// Type-safe SQL comparison operator
///
/// The constants below are the full whitelist; arbitrary operator text cannot
/// be smuggled into a filter triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(&'static str);

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const NE: Self = Operator("<>");
    pub const NEQ: Self = Operator("!=");
    pub const GT: Self = Operator(">");
    pub const LT: Self = Operator("<");
    pub const GTE: Self = Operator(">=");
    pub const LTE: Self = Operator("<=");
    pub const BETWEEN: Self = Operator("BETWEEN");
    pub const LIKE: Self = Operator("LIKE");
    pub const IN: Self = Operator("IN");

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &str {
        self.0
    }

    /// Parse an operator string against the whitelist
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "=" => Some(Operator::EQ),
            "<>" => Some(Operator::NE),
            "!=" => Some(Operator::NEQ),
            ">" => Some(Operator::GT),
            "<" => Some(Operator::LT),
            ">=" => Some(Operator::GTE),
            "<=" => Some(Operator::LTE),
            "BETWEEN" | "between" => Some(Operator::BETWEEN),
            "LIKE" | "like" => Some(Operator::LIKE),
            "IN" | "in" => Some(Operator::IN),
            _ => None,
        }
    }

    /// Check whether a string constitutes a whitelisted operator
    pub fn verify(op: &str) -> bool {
        Self::parse(op).is_some()
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// Allow string literals for the whitelisted operators
impl IntoOperator for &str {
    fn into_operator(self) -> Operator {
        match Operator::parse(self) {
            Some(op) => op,
            None => panic!(
                "Unknown operator '{}'. Use the Operator constants or one of: =, <>, !=, >, <, >=, <=, BETWEEN, LIKE, IN.",
                self
            ),
        }
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const NE: Operator = Operator::NE;
    pub const NEQ: Operator = Operator::NEQ;
    pub const GT: Operator = Operator::GT;
    pub const LT: Operator = Operator::LT;
    pub const GTE: Operator = Operator::GTE;
    pub const LTE: Operator = Operator::LTE;
    pub const BETWEEN: Operator = Operator::BETWEEN;
    pub const LIKE: Operator = Operator::LIKE;
    pub const IN: Operator = Operator::IN;
}
