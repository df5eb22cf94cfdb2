//! Value types for composed SQL text

use serde::{Deserialize, Serialize};

/// A scalar that can appear in a composed query
///
/// The set of variants is closed on purpose: rendering matches exhaustively,
/// so a value can never fall through to a default textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// String literal, emitted single-quoted and verbatim (no escaping)
    Text(String),
    /// Bind placeholder, emitted with a leading `:` unless one (or `?`) is present
    Bind(String),
    /// Signed integer
    Integer(i64),
    /// Unsigned integer
    Unsigned(u64),
    /// Floating point number
    Float(f64),
    /// Boolean, emitted as `true`/`false`
    Boolean(bool),
    /// Raw text spliced into the query unquoted
    Raw(String),
}

impl Value {
    /// Create a bind placeholder value
    pub fn bind(name: impl Into<String>) -> Self {
        Value::Bind(name.into())
    }

    /// Create a raw (unquoted) text value
    pub fn raw(text: impl Into<String>) -> Self {
        Value::Raw(text.into())
    }

    /// Render this value as it appears in composed SQL text
    ///
    /// Text is single-quoted with no escaping; embedding untrusted input
    /// directly instead of via a bind placeholder is the caller's problem.
    pub fn render(&self) -> String {
        match self {
            Value::Text(text) => format!("'{}'", text),
            Value::Bind(name) => {
                if name.starts_with(':') || name.starts_with('?') {
                    name.clone()
                } else {
                    format!(":{}", name)
                }
            }
            Value::Integer(n) => n.to_string(),
            Value::Unsigned(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Raw(text) => text.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Boolean(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::Integer(val as i64)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::Integer(val)
    }
}

impl From<u32> for Value {
    fn from(val: u32) -> Self {
        Value::Unsigned(val as u64)
    }
}

impl From<u64> for Value {
    fn from(val: u64) -> Self {
        Value::Unsigned(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::Float(val as f64)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rendering() {
        assert_eq!(Value::from("x").render(), "'x'");
        assert_eq!(Value::from("O'Brien").render(), "'O'Brien'"); // verbatim, no escaping
    }

    #[test]
    fn test_bind_rendering() {
        assert_eq!(Value::bind("name").render(), ":name");
        assert_eq!(Value::bind(":name").render(), ":name");
        assert_eq!(Value::bind("?name").render(), "?name");
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(Value::from(42).render(), "42");
        assert_eq!(Value::from(42u64).render(), "42");
        assert_eq!(Value::from(-7i64).render(), "-7");
        assert_eq!(Value::from(true).render(), "true");
        assert_eq!(Value::from(2.5).render(), "2.5");
    }

    #[test]
    fn test_raw_rendering() {
        assert_eq!(Value::raw("NOW()").render(), "NOW()");
    }

    #[test]
    fn test_display_matches_render() {
        let value = Value::bind("id");
        assert_eq!(format!("{}", value), value.render());
    }
}
