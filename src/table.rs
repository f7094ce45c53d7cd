use crate::context::CompileContext;
use crate::error::{QueryError, QueryResult};
use crate::select::SelectQuery;
use crate::transpiler::{Compiled, ToSqlWithArgs};
use crate::value::Value;

/// What a `from` clause reads.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Name(String),
    /// Derived table, always aliased.
    Subquery(Box<SelectQuery>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: TableSource,
    pub alias: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self { source: TableSource::Name(name.into()), alias: None }
    }

    pub fn subquery(query: SelectQuery) -> Self {
        Self { source: TableSource::Subquery(Box::new(query)), alias: None }
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
            TableSource::Name(name) if name.is_empty() => Err(QueryError::NameIsRequired),
            TableSource::Subquery(_) if self.alias_name().is_none() => Err(QueryError::AliasIsRequired),
            _ => Ok(()),
        }
    }

    pub fn to_sql_with_alias(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        let (sql, args) = self.compile(ctx, args)?;
        match self.alias_name() {
            Some(alias) => Ok((format!("{} as {}", sql, alias), args)),
            None => Ok((sql, args)),
        }
    }
}

impl From<&str> for Table {
    fn from(name: &str) -> Self {
        Table::new(name)
    }
}

impl From<String> for Table {
    fn from(name: String) -> Self {
        Table::new(name)
    }
}

impl ToSqlWithArgs for Table {
    fn compile(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        self.validate()?;

        match &self.source {
            TableSource::Name(name) => Ok((name.clone(), args)),
            TableSource::Subquery(query) => {
                let (sql, args) = query.to_sql_with_alias(&ctx.descend()?, args)?;
                Ok((format!("({})", sql), args))
            }
        }
    }
}
