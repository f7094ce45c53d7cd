//! Column references and scalar sub-queries in select lists and conditions.

use crate::context::CompileContext;
use crate::error::{QueryError, QueryResult};
use crate::select::SelectQuery;
use crate::transpiler::{Compiled, ToSqlWithArgs};
use crate::value::Value;

/// Where a field's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// `column` or `table.column`
    Column { table: Option<String>, name: String },
    /// `(select ...)`, always aliased
    Subquery(Box<SelectQuery>),
}

/// A field of a select list or the left side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub source: FieldSource,
    pub alias: Option<String>,
}

impl Field {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            source: FieldSource::Column { table: None, name: column.into() },
            alias: None,
        }
    }

    pub fn subquery(query: SelectQuery) -> Self {
        Self { source: FieldSource::Subquery(Box::new(query)), alias: None }
    }

    /// Qualify the column with a table name. No effect on sub-query fields.
    pub fn from_table(mut self, table: impl Into<String>) -> Self {
        if let FieldSource::Column { table: t, .. } = &mut self.source {
            *t = Some(table.into());
        }
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref().filter(|a| !a.is_empty())
    }

    pub fn validate(&self) -> QueryResult<()> {
        match &self.source {
            FieldSource::Column { name, .. } if name.is_empty() => Err(QueryError::ColumnIsRequired),
            FieldSource::Subquery(_) if self.alias_name().is_none() => Err(QueryError::AliasIsRequired),
            _ => Ok(()),
        }
    }

    /// Compile and append ` as <alias>` when an alias is set.
    pub fn to_sql_with_alias(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        let (sql, args) = self.compile(ctx, args)?;
        match self.alias_name() {
            Some(alias) => Ok((format!("{} as {}", sql, alias), args)),
            None => Ok((sql, args)),
        }
    }
}

impl From<&str> for Field {
    fn from(column: &str) -> Self {
        Field::new(column)
    }
}

impl From<String> for Field {
    fn from(column: String) -> Self {
        Field::new(column)
    }
}

impl ToSqlWithArgs for Field {
    fn compile(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        self.validate()?;

        match &self.source {
            FieldSource::Column { table: Some(table), name } if !table.is_empty() => {
                Ok((format!("{}.{}", table, name), args))
            }
            FieldSource::Column { name, .. } => Ok((name.clone(), args)),
            FieldSource::Subquery(query) => {
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
    use crate::filter::Filter;
    use crate::operator::Operator;
    use crate::select::select;
    use crate::table::Table;

    #[test]
    fn test_column() {
        let (sql, args) = Field::new("field1").to_sql_with_args(Dialect::Postgres, vec![]).unwrap();
        assert_eq!(sql, "field1");
        assert!(args.is_empty());
    }

    #[test]
    fn test_table_qualified_column() {
        let (sql, _) = Field::new("f").from_table("t").to_sql_with_args(Dialect::MySQL, vec![]).unwrap();
        assert_eq!(sql, "t.f");
    }

    #[test]
    fn test_empty_column() {
        let err = Field::new("").to_sql_with_args(Dialect::MySQL, vec![]).unwrap_err();
        assert_eq!(err, QueryError::ColumnIsRequired);
    }

    #[test]
    fn test_subquery_requires_alias() {
        let field = Field::subquery(select(["field1"]).from(Table::new("table1")));
        let err = field.to_sql_with_args(Dialect::Postgres, vec![]).unwrap_err();
        assert_eq!(err, QueryError::AliasIsRequired);
    }

    #[test]
    fn test_subquery_field() {
        let field = Field::subquery(select(["field1"]).from(Table::new("table1"))).alias("alias1");
        let ctx = CompileContext::new(Dialect::Postgres);

        let (sql, _) = field.compile(&ctx, vec![]).unwrap();
        assert_eq!(sql, "(select field1 from table1)");

        let (sql, _) = field.to_sql_with_alias(&ctx, vec![]).unwrap();
        assert_eq!(sql, "(select field1 from table1) as alias1");
    }

    #[test]
    fn test_column_alias() {
        let ctx = CompileContext::new(Dialect::Postgres);
        let (sql, _) = Field::new("field1").alias("alias1").to_sql_with_alias(&ctx, vec![]).unwrap();
        assert_eq!(sql, "field1 as alias1");
    }

    #[test]
    fn test_subquery_arguments_continue_numbering() {
        let inner = select(["id"])
            .from(Table::new("orders"))
            .where_(Filter::condition("total", Operator::GreaterThan, 100));
        let field = Field::subquery(inner).alias("big");

        let (sql, args) = field
            .to_sql_with_args(Dialect::Postgres, vec![Value::from("x")])
            .unwrap();
        assert_eq!(sql, "(select id from orders where total > $2)");
        assert_eq!(args, vec![Value::from("x"), Value::from(100)]);
    }
}
