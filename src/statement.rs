//! `insert`, `update` and `delete` statements.
//!
//! Thin record-holders around the compiler: each collects its parts through
//! chained setters and compiles from an empty argument list.

use std::collections::BTreeMap;

use crate::context::CompileContext;
use crate::error::{QueryError, QueryResult};
use crate::filter::Filter;
use crate::transpiler::{Compiled, Statement, ToSqlWithArgs};
use crate::value::Value;

/// Reject values that can only appear inside `in` lists.
fn check_bindable(value: &Value) -> QueryResult<()> {
    let kind = value.kind();
    if value.is_null() || kind.is_scalar() {
        Ok(())
    } else {
        Err(QueryError::UnsupportedValueType { kind: kind.name() })
    }
}

/// Append `where <filter>` when the filter renders anything.
fn push_where(sql: &mut String, filter: &Filter, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Vec<Value>> {
    let (where_clause, args) = filter.compile(ctx, args)?;
    if !where_clause.is_empty() {
        sql.push_str(" where ");
        sql.push_str(&where_clause);
    }
    Ok(args)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsertQuery {
    pub table: String,
    /// Column name to its values, one per row. Columns render sorted by name.
    pub fields_values: BTreeMap<String, Vec<Value>>,
}

pub fn insert() -> InsertQuery {
    InsertQuery::default()
}

impl InsertQuery {
    pub fn into(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Append a value for `field`; the n-th call for a field fills row n.
    pub fn value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields_values.entry(field.into()).or_default().push(value.into());
        self
    }

    fn columns_and_rows(&self) -> (Vec<&str>, Vec<Vec<&Value>>) {
        let columns: Vec<&str> = self.fields_values.keys().map(String::as_str).collect();
        let row_count = self.fields_values.values().map(Vec::len).max().unwrap_or(0);

        let rows = (0..row_count)
            .map(|row| {
                self.fields_values
                    .values()
                    .filter_map(|values| values.get(row))
                    .collect()
            })
            .collect();

        (columns, rows)
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.table.is_empty() {
            return Err(QueryError::TableIsRequired);
        }

        let (columns, rows) = self.columns_and_rows();
        if columns.is_empty() {
            return Err(QueryError::FieldsIsRequired);
        }
        if columns.iter().any(|c| c.is_empty()) {
            return Err(QueryError::FieldIsRequired);
        }
        if rows.is_empty() {
            return Err(QueryError::ValuesIsRequired);
        }

        for row in &rows {
            if row.len() != columns.len() {
                return Err(QueryError::ValueLengthIsNotEqualToFieldsLength);
            }
            for value in row {
                check_bindable(value)?;
            }
        }

        Ok(())
    }
}

impl Statement for InsertQuery {
    fn build(&self, ctx: &CompileContext) -> QueryResult<Compiled> {
        self.validate()?;
        tracing::debug!(dialect = %ctx.dialect, table = %self.table, "compiling insert");

        let (columns, rows) = self.columns_and_rows();
        let mut args: Vec<Value> = Vec::with_capacity(columns.len() * rows.len());
        let mut groups = Vec::with_capacity(rows.len());

        for row in rows {
            let start = args.len() + 1;
            args.extend(row.into_iter().cloned());
            groups.push(format!("({})", ctx.dialect.placeholder(start, args.len())));
        }

        let sql = format!(
            "insert into {}({}) values {}",
            self.table,
            columns.join(", "),
            groups.join(", ")
        );
        tracing::debug!(args = args.len(), "compiled insert");
        Ok((sql, args))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateQuery {
    pub table: String,
    /// Assignments in the order they were first set.
    pub fields_values: Vec<(String, Value)>,
    pub filter: Option<Filter>,
}

pub fn update(table: impl Into<String>) -> UpdateQuery {
    UpdateQuery { table: table.into(), ..UpdateQuery::default() }
}

impl UpdateQuery {
    /// Assign `value` to `field`, replacing an earlier assignment.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.fields_values.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields_values.push((field, value)),
        }
        self
    }

    pub fn where_(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.table.is_empty() {
            return Err(QueryError::TableIsRequired);
        }
        if self.fields_values.is_empty() {
            return Err(QueryError::FieldsIsRequired);
        }
        for (field, value) in &self.fields_values {
            if field.is_empty() {
                return Err(QueryError::FieldIsRequired);
            }
            check_bindable(value)?;
        }
        if self.filter.is_none() {
            return Err(QueryError::FilterIsRequired);
        }
        Ok(())
    }
}

impl Statement for UpdateQuery {
    fn build(&self, ctx: &CompileContext) -> QueryResult<Compiled> {
        self.validate()?;
        tracing::debug!(dialect = %ctx.dialect, table = %self.table, "compiling update");

        let mut args: Vec<Value> = Vec::with_capacity(self.fields_values.len());
        let mut assignments = Vec::with_capacity(self.fields_values.len());
        for (field, value) in &self.fields_values {
            args.push(value.clone());
            assignments.push(format!("{} = {}", field, ctx.dialect.last_placeholder(args.len())));
        }

        let mut sql = format!("update {} set {}", self.table, assignments.join(", "));
        if let Some(filter) = &self.filter {
            args = push_where(&mut sql, filter, ctx, args)?;
        }

        tracing::debug!(args = args.len(), "compiled update");
        Ok((sql, args))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteQuery {
    pub table: String,
    pub filter: Option<Filter>,
}

pub fn delete() -> DeleteQuery {
    DeleteQuery::default()
}

impl DeleteQuery {
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn where_(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.table.is_empty() {
            return Err(QueryError::TableIsRequired);
        }
        if self.filter.is_none() {
            return Err(QueryError::FilterIsRequired);
        }
        Ok(())
    }
}

impl Statement for DeleteQuery {
    fn build(&self, ctx: &CompileContext) -> QueryResult<Compiled> {
        self.validate()?;
        tracing::debug!(dialect = %ctx.dialect, table = %self.table, "compiling delete");

        let mut sql = format!("delete from {}", self.table);
        let mut args = Vec::new();
        if let Some(filter) = &self.filter {
            args = push_where(&mut sql, filter, ctx, args)?;
        }

        tracing::debug!(args = args.len(), "compiled delete");
        Ok((sql, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::operator::Operator;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_multiple_rows() {
        let query = insert()
            .into("table1")
            .value("field2", "b1")
            .value("field1", "a1")
            .value("field1", "a2")
            .value("field2", "b2");

        let (sql, args) = query.build_sql(Dialect::MySQL).unwrap();
        assert_eq!(sql, "insert into table1(field1, field2) values (?, ?), (?, ?)");
        assert_eq!(
            args,
            vec![Value::from("a1"), Value::from("b1"), Value::from("a2"), Value::from("b2")]
        );

        let (sql, _) = query.build_sql(Dialect::Postgres).unwrap();
        assert_eq!(sql, "insert into table1(field1, field2) values ($1, $2), ($3, $4)");
    }

    #[test]
    fn test_insert_validation() {
        assert_eq!(insert().validate(), Err(QueryError::TableIsRequired));
        assert_eq!(insert().into("t").validate(), Err(QueryError::FieldsIsRequired));
        assert_eq!(insert().into("t").value("", 1).validate(), Err(QueryError::FieldIsRequired));

        let mut empty_rows = insert().into("t");
        empty_rows.fields_values.insert("a".to_string(), vec![]);
        assert_eq!(empty_rows.validate(), Err(QueryError::ValuesIsRequired));

        let ragged = insert().into("t").value("a", 1).value("a", 2).value("b", 3);
        assert_eq!(ragged.validate(), Err(QueryError::ValueLengthIsNotEqualToFieldsLength));

        let list = insert().into("t").value("a", vec![1, 2]);
        assert_eq!(
            list.build_sql(Dialect::MySQL).unwrap_err().to_string(),
            "unsupported slice value type"
        );

        assert!(insert().into("t").value("a", None::<i32>).validate().is_ok());
    }

    #[test]
    fn test_update_numbering_continues_into_where() {
        let query = update("users")
            .set("name", "ann")
            .set("age", 30)
            .set("name", "bob")
            .where_(Filter::and([
                Filter::condition("id", Operator::Equal, 7),
                Filter::condition("role", Operator::In, ["a", "b"]),
            ]));

        let (sql, args) = query.build_sql(Dialect::Postgres).unwrap();
        assert_eq!(sql, "update users set name = $1, age = $2 where id = $3 and role in ($4, $5)");
        assert_eq!(
            args,
            vec![Value::from("bob"), Value::from(30), Value::from(7), Value::from("a"), Value::from("b")]
        );
    }

    #[test]
    fn test_update_validation() {
        assert_eq!(update("").validate(), Err(QueryError::TableIsRequired));
        assert_eq!(update("t").validate(), Err(QueryError::FieldsIsRequired));
        assert_eq!(update("t").set("", 1).validate(), Err(QueryError::FieldIsRequired));
        assert_eq!(update("t").set("a", 1).validate(), Err(QueryError::FilterIsRequired));
        assert_eq!(
            update("t").set("a", [1, 2]).where_(Filter::is_null("b")).validate(),
            Err(QueryError::UnsupportedValueType { kind: "slice" })
        );
    }

    #[test]
    fn test_delete() {
        let query = delete().from("sessions").where_(Filter::or([
            Filter::condition("expired", Operator::Equal, true),
            Filter::is_null("user_id"),
        ]));
        let (sql, args) = query.build_sql(Dialect::MySQL).unwrap();
        assert_eq!(sql, "delete from sessions where expired = ? or user_id is null");
        assert_eq!(args, vec![Value::from(true)]);

        assert_eq!(delete().validate(), Err(QueryError::TableIsRequired));
        assert_eq!(delete().from("t").validate(), Err(QueryError::FilterIsRequired));
    }

    #[test]
    fn test_filter_errors_surface_from_statements() {
        let query = delete().from("t").where_(Filter::condition("a", Operator::Like, 3));
        assert_eq!(
            query.build_sql(Dialect::Postgres).unwrap_err().to_string(),
            "unsupported int64 value type for operator like"
        );
    }
}
