use crate::context::CompileContext;
use crate::error::QueryResult;
use crate::select::SelectQuery;
use crate::transpiler::{Compiled, ToSqlWithArgs};
use crate::value::Value;

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Bound as an argument; the caller renders the placeholder.
    Value(Value),
    /// Rendered inline as `(select ...)`.
    Subquery(Box<SelectQuery>),
}

impl FilterValue {
    pub fn value(value: impl Into<Value>) -> Self {
        FilterValue::Value(value.into())
    }

    pub fn subquery(query: SelectQuery) -> Self {
        FilterValue::Subquery(Box::new(query))
    }

    /// A literal NULL counts as no value at all.
    pub fn is_nil(&self) -> bool {
        matches!(self, FilterValue::Value(Value::Null))
    }
}

impl From<SelectQuery> for FilterValue {
    fn from(query: SelectQuery) -> Self {
        FilterValue::subquery(query)
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        FilterValue::Value(value)
    }
}

impl ToSqlWithArgs for FilterValue {
    fn compile(&self, ctx: &CompileContext, mut args: Vec<Value>) -> QueryResult<Compiled> {
        match self {
            FilterValue::Value(value) => {
                args.push(value.clone());
                Ok((String::new(), args))
            }
            FilterValue::Subquery(query) => {
                let (sql, args) = query.to_sql_with_alias(&ctx.descend()?, args)?;
                Ok((format!("({})", sql), args))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::select::select;
    use crate::table::Table;

    #[test]
    fn test_literal_appends_argument() {
        let (sql, args) = FilterValue::value("value1")
            .to_sql_with_args(Dialect::MySQL, vec![Value::from(1)])
            .unwrap();
        assert_eq!(sql, "");
        assert_eq!(args, vec![Value::from(1), Value::from("value1")]);
    }

    #[test]
    fn test_null_is_still_appended() {
        let (sql, args) = FilterValue::Value(Value::Null)
            .to_sql_with_args(Dialect::Postgres, vec![])
            .unwrap();
        assert_eq!(sql, "");
        assert_eq!(args, vec![Value::Null]);
    }

    #[test]
    fn test_subquery_is_parenthesized() {
        let value = FilterValue::subquery(select(["field1"]).from(Table::new("table1")));
        let (sql, args) = value.to_sql_with_args(Dialect::Postgres, vec![]).unwrap();
        assert_eq!(sql, "(select field1 from table1)");
        assert!(args.is_empty());
    }
}
