//! Target dialect selection and its effect on clause shape

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// SQL dialect the composed text targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// MySQL specific syntax
    #[default]
    MySql,
    /// PostgreSQL specific syntax
    Postgres,
    /// Microsoft-style syntax (bounding via TOP)
    Microsoft,
}

impl Dialect {
    /// Compose the trailing limit/offset clause for this dialect
    ///
    /// MySQL renders `LIMIT <offset>, <limit>` with the limit defaulting to
    /// the maximum representable value when only an offset was set. The
    /// Microsoft dialect bounds via TOP inside the select clause, so nothing
    /// is emitted here. PostgreSQL limit composition is an explicit
    /// unimplemented case: setting a bound under it is a configuration error
    /// rather than a silently dropped clause.
    pub fn limit_offset_clause(self, limit: Option<u64>, offset: Option<u64>) -> Result<String> {
        match self {
            Dialect::MySql => {
                if let Some(offset) = offset {
                    Ok(format!("LIMIT {}, {} ", offset, limit.unwrap_or(u64::MAX)))
                } else if let Some(limit) = limit {
                    Ok(format!("LIMIT {} ", limit))
                } else {
                    Ok(String::new())
                }
            }
            Dialect::Postgres => {
                if limit.is_some() || offset.is_some() {
                    Err(Error::UnsupportedLimit { dialect: self })
                } else {
                    Ok(String::new())
                }
            }
            Dialect::Microsoft => Ok(String::new()),
        }
    }

    /// Whether bounding is expressed as `TOP <n>` inside the select clause
    pub fn bounds_via_top(self) -> bool {
        matches!(self, Dialect::Microsoft)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dialect::MySql => "MySQL",
            Dialect::Postgres => "PostgreSQL",
            Dialect::Microsoft => "Microsoft",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_limit_only() {
        let clause = Dialect::MySql.limit_offset_clause(Some(10), None).unwrap();
        assert_eq!(clause, "LIMIT 10 ");
    }

    #[test]
    fn test_mysql_limit_and_offset() {
        let clause = Dialect::MySql.limit_offset_clause(Some(10), Some(5)).unwrap();
        assert_eq!(clause, "LIMIT 5, 10 ");
    }

    #[test]
    fn test_mysql_offset_without_limit() {
        let clause = Dialect::MySql.limit_offset_clause(None, Some(5)).unwrap();
        assert_eq!(clause, format!("LIMIT 5, {} ", u64::MAX));
    }

    #[test]
    fn test_mysql_no_bounds() {
        let clause = Dialect::MySql.limit_offset_clause(None, None).unwrap();
        assert_eq!(clause, "");
    }

    #[test]
    fn test_postgres_bound_is_fatal() {
        let result = Dialect::Postgres.limit_offset_clause(Some(10), None);
        assert!(matches!(result, Err(Error::UnsupportedLimit { .. })));

        let result = Dialect::Postgres.limit_offset_clause(None, Some(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_postgres_without_bounds_is_empty() {
        let clause = Dialect::Postgres.limit_offset_clause(None, None).unwrap();
        assert_eq!(clause, "");
    }

    #[test]
    fn test_microsoft_emits_nothing() {
        // Bounding already happened via TOP in the select clause.
        let clause = Dialect::Microsoft
            .limit_offset_clause(Some(10), Some(5))
            .unwrap();
        assert_eq!(clause, "");
        assert!(Dialect::Microsoft.bounds_via_top());
    }
}
