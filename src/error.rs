//! Error types for simple-query.

use thiserror::Error;

/// The main error type for query compilation.
///
/// Messages are stable: callers match on the rendered text as well as the variant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    /// A sub-query used as a field or table has no alias.
    #[error("alias is required")]
    AliasIsRequired,

    /// A field names no column.
    #[error("column is required")]
    ColumnIsRequired,

    /// A field document sets both a column and a sub-query.
    #[error("conflict between field column and field select query")]
    ConflictFieldColumnAndFieldSelectQuery,

    /// A table document sets both a name and a sub-query.
    #[error("conflict between table name and table select query")]
    ConflictTableNameAndTableSelectQuery,

    /// An empty dialect name.
    #[error("dialect is required")]
    DialectIsRequired,

    /// A `null` entry in a select field list.
    #[error("field is nil")]
    FieldIsNil,

    /// A logic node carries a field.
    #[error("field is not empty")]
    FieldIsNotEmpty,

    /// A condition, sort or assignment names no field.
    #[error("field is required")]
    FieldIsRequired,

    /// A statement has no fields.
    #[error("fields is required")]
    FieldsIsRequired,

    /// `update`/`delete` without a `where` filter.
    #[error("filter is required")]
    FilterIsRequired,

    /// A logic node has no children.
    #[error("filters is required")]
    FiltersIsRequired,

    /// Children given without `and`/`or`.
    #[error("logic is required")]
    LogicIsRequired,

    /// A table has an empty name.
    #[error("name is required")]
    NameIsRequired,

    /// A logic node carries an operator.
    #[error("operator is not empty")]
    OperatorIsNotEmpty,

    /// A condition has no operator.
    #[error("operator is required")]
    OperatorIsRequired,

    /// A statement has no table.
    #[error("table is required")]
    TableIsRequired,

    /// A value was given where none is allowed.
    #[error("value is not nil")]
    ValueIsNotNil,

    /// A value-bearing operator has no value, or an empty list.
    #[error("value is required")]
    ValueIsRequired,

    /// An insert row does not cover every column.
    #[error("value length is not equal to fields length")]
    ValueLengthIsNotEqualToFieldsLength,

    /// An insert has columns but no rows.
    #[error("values is required")]
    ValuesIsRequired,

    /// The value's kind is not accepted by the operator.
    #[error("unsupported {kind} value type for operator {operator}")]
    UnsupportedValueTypeForOperator {
        kind: &'static str,
        operator: &'static str,
    },

    /// An element of an `in`/`not in` list is not a scalar.
    #[error("unsupported {kind} type of element value for operator {operator}")]
    UnsupportedElementTypeForOperator {
        kind: &'static str,
        operator: &'static str,
    },

    /// A value that can never be bound (lists in `set`/`values`, objects in documents).
    #[error("unsupported {kind} value type")]
    UnsupportedValueType { kind: &'static str },

    /// Dialect name not recognized.
    #[error("unsupported dialect {0}")]
    UnsupportedDialect(String),

    /// Nesting of filters or sub-queries went past the configured limit.
    #[error("maximum depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    /// A select asked for more rows than `max_take` allows.
    #[error("maximum take is {0}")]
    MaxTakeExceeded(u64),

    /// The description document could not be decoded.
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error, kept as text so the error stays `Clone + PartialEq`.
    #[error("IO error: {0}")]
    Io(String),
}

impl QueryError {
    pub fn unsupported_for(kind: &'static str, operator: &'static str) -> Self {
        Self::UnsupportedValueTypeForOperator { kind, operator }
    }

    pub fn unsupported_element_for(kind: &'static str, operator: &'static str) -> Self {
        Self::UnsupportedElementTypeForOperator { kind, operator }
    }
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for query compilation.
pub type QueryResult<T> = Result<T, QueryError>;
