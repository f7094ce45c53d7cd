use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical operator combining child filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub fn keyword(&self) -> &'static str {
        match self {
            Logic::And => "and",
            Logic::Or => "or",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Comparison operator of a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Like,
    NotLike,
}

/// How an operator consumes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// One scalar argument.
    Comparison,
    /// No value at all.
    NullCheck,
    /// A non-empty list of scalars.
    Membership,
    /// One string argument, wrapped in `%...%`.
    Pattern,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::In,
        Operator::NotIn,
        Operator::Like,
        Operator::NotLike,
    ];

    /// Identifier used in error messages and description documents.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanOrEqual => "greater_than_or_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEqual => "less_than_or_equal",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Like => "like",
            Operator::NotLike => "not_like",
        }
    }

    /// SQL spelling. `like`/`not like` are further adjusted per dialect.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Like => "like",
            Operator::NotLike => "not like",
        }
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            Operator::Equal
            | Operator::NotEqual
            | Operator::GreaterThan
            | Operator::GreaterThanOrEqual
            | Operator::LessThan
            | Operator::LessThanOrEqual => OperatorClass::Comparison,
            Operator::IsNull | Operator::IsNotNull => OperatorClass::NullCheck,
            Operator::In | Operator::NotIn => OperatorClass::Membership,
            Operator::Like | Operator::NotLike => OperatorClass::Pattern,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}
