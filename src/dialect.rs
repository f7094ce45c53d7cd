use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Supported SQL Dialects.
///
/// Dialects differ only in placeholder syntax and in the spelling of the
/// case-insensitive match operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `?` placeholders, `like`.
    MySQL,
    /// `$N` placeholders, `ilike`.
    #[default]
    Postgres,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::MySQL, Dialect::Postgres];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::MySQL => "mysql",
            Dialect::Postgres => "postgres",
        }
    }

    /// Render the placeholders for the 1-based inclusive range `[start, end]`
    /// of the final argument list.
    ///
    /// An invalid range yields an empty string; callers always pass the range
    /// of arguments they have just appended.
    pub fn placeholder(&self, start: usize, end: usize) -> String {
        if start == 0 || end == 0 || end < start {
            return String::new();
        }

        match self {
            Dialect::MySQL => vec!["?"; end - start + 1].join(", "),
            Dialect::Postgres => (start..=end)
                .map(|i| format!("${}", i))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Placeholder for the argument that was just pushed onto `args`.
    pub fn last_placeholder(&self, args_len: usize) -> String {
        self.placeholder(args_len, args_len)
    }

    /// Keyword used for `like`/`not like` conditions.
    pub fn like_operator(&self, negated: bool) -> &'static str {
        match (self, negated) {
            (Dialect::MySQL, false) => "like",
            (Dialect::MySQL, true) => "not like",
            (Dialect::Postgres, false) => "ilike",
            (Dialect::Postgres, true) => "not ilike",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err(QueryError::DialectIsRequired),
            "mysql" => Ok(Dialect::MySQL),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            other => Err(QueryError::UnsupportedDialect(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_placeholder() {
        assert_eq!(Dialect::MySQL.placeholder(1, 1), "?");
        assert_eq!(Dialect::MySQL.placeholder(4, 4), "?");
        assert_eq!(Dialect::MySQL.placeholder(2, 4), "?, ?, ?");
    }

    #[test]
    fn test_postgres_placeholder() {
        assert_eq!(Dialect::Postgres.placeholder(1, 1), "$1");
        assert_eq!(Dialect::Postgres.placeholder(3, 3), "$3");
        assert_eq!(Dialect::Postgres.placeholder(2, 5), "$2, $3, $4, $5");
    }

    #[test]
    fn test_invalid_range_is_empty() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.placeholder(0, 1), "");
            assert_eq!(dialect.placeholder(1, 0), "");
            assert_eq!(dialect.placeholder(3, 2), "");
        }
    }

    #[test]
    fn test_like_operator() {
        assert_eq!(Dialect::MySQL.like_operator(false), "like");
        assert_eq!(Dialect::MySQL.like_operator(true), "not like");
        assert_eq!(Dialect::Postgres.like_operator(false), "ilike");
        assert_eq!(Dialect::Postgres.like_operator(true), "not ilike");
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("mysql".parse::<Dialect>(), Ok(Dialect::MySQL));
        assert_eq!("Postgres".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("".parse::<Dialect>(), Err(QueryError::DialectIsRequired));
        assert_eq!(
            "oracle".parse::<Dialect>(),
            Err(QueryError::UnsupportedDialect("oracle".to_string()))
        );
    }
}
