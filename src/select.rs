//! `select` statements, usable on their own or embedded as sub-queries.

use crate::context::CompileContext;
use crate::error::{QueryError, QueryResult};
use crate::field::Field;
use crate::filter::Filter;
use crate::sort::Sort;
use crate::table::Table;
use crate::transpiler::{Compiled, Statement, ToSqlWithArgs};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub fields: Vec<Field>,
    pub table: Option<Table>,
    pub filter: Option<Filter>,
    /// `None` entries are skipped.
    pub sorts: Vec<Option<Sort>>,
    /// Rendered as `limit` when non-zero.
    pub take: u64,
    /// Set when the query is embedded as `(select ...) as <alias>`.
    pub alias: Option<String>,
}

/// Start a select over `fields`.
///
/// ```
/// use simple_query::prelude::*;
///
/// let query = select(["id", "email"])
///     .from("users")
///     .where_(Filter::condition("active", Operator::Equal, true))
///     .order_by([Sort::desc("created_at")])
///     .limit(10);
/// let (sql, args) = query.build_sql(Dialect::Postgres).unwrap();
/// assert_eq!(sql, "select id, email from users where active = $1 order by created_at desc limit $2");
/// assert_eq!(args, vec![Value::Bool(true), Value::UInt(10)]);
/// ```
pub fn select<I, F>(fields: I) -> SelectQuery
where
    I: IntoIterator<Item = F>,
    F: Into<Field>,
{
    SelectQuery {
        fields: fields.into_iter().map(Into::into).collect(),
        ..SelectQuery::default()
    }
}

impl SelectQuery {
    pub fn from(mut self, table: impl Into<Table>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn where_(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Replace the sort list.
    pub fn order_by(mut self, sorts: impl IntoIterator<Item = Sort>) -> Self {
        self.sorts = sorts.into_iter().map(Some).collect();
        self
    }

    pub fn limit(mut self, take: u64) -> Self {
        self.take = take;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn validate(&self, ctx: &CompileContext) -> QueryResult<()> {
        if self.fields.is_empty() {
            return Err(QueryError::FieldsIsRequired);
        }
        if self.table.is_none() {
            return Err(QueryError::TableIsRequired);
        }
        if let Some(max) = ctx.options.max_take {
            if self.take > max {
                return Err(QueryError::MaxTakeExceeded(max));
            }
        }
        Ok(())
    }

    /// Compile and wrap as `(<sql>) as <alias>` when an alias is set.
    pub fn to_sql_with_alias(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        let (sql, args) = self.compile(ctx, args)?;
        match self.alias.as_deref().filter(|a| !a.is_empty()) {
            Some(alias) => Ok((format!("({}) as {}", sql, alias), args)),
            None => Ok((sql, args)),
        }
    }

    fn order_by_clause(&self) -> QueryResult<Vec<String>> {
        let mut clauses = Vec::with_capacity(self.sorts.len());
        for (i, sort) in self.sorts.iter().enumerate() {
            match sort {
                Some(sort) => clauses.push(sort.to_sql()?),
                None => tracing::trace!(index = i, "skipping empty sort"),
            }
        }
        Ok(clauses)
    }
}

impl ToSqlWithArgs for SelectQuery {
    fn compile(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        self.validate(ctx)?;

        let mut args = args;
        let mut columns = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let (sql, next) = field.to_sql_with_alias(ctx, args)?;
            columns.push(sql);
            args = next;
        }

        let table = self.table.as_ref().ok_or(QueryError::TableIsRequired)?;
        let (from, mut args) = table.to_sql_with_alias(ctx, args)?;

        let mut sql = format!("select {} from {}", columns.join(", "), from);

        if let Some(filter) = &self.filter {
            let (where_clause, next) = filter.compile(ctx, args)?;
            args = next;
            if !where_clause.is_empty() {
                sql.push_str(" where ");
                sql.push_str(&where_clause);
            }
        }

        let order_by = self.order_by_clause()?;
        if !order_by.is_empty() {
            sql.push_str(" order by ");
            sql.push_str(&order_by.join(", "));
        }

        if self.take > 0 {
            args.push(Value::UInt(self.take));
            sql.push_str(" limit ");
            sql.push_str(&ctx.dialect.last_placeholder(args.len()));
        }

        Ok((sql, args))
    }
}

impl Statement for SelectQuery {
    fn build(&self, ctx: &CompileContext) -> QueryResult<Compiled> {
        tracing::debug!(dialect = %ctx.dialect, "compiling select");
        let (sql, args) = self.compile(ctx, Vec::new())?;
        tracing::debug!(args = args.len(), "compiled select");
        Ok((sql, args))
    }
}
