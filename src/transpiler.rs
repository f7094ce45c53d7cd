//! Compile contract shared by every node of a query tree.
//!
//! Arguments are threaded by value: each node takes the arguments bound so
//! far and hands back the extended list, so the final order is always the
//! pre-order, left-to-right order of the argument-producing leaves.

use crate::context::{CompileContext, CompileOptions};
use crate::dialect::Dialect;
use crate::error::QueryResult;
use crate::value::Value;

/// A compiled fragment and the arguments bound up to and including it.
pub type Compiled = (String, Vec<Value>);

/// Trait for converting AST nodes to parameterized SQL.
pub trait ToSqlWithArgs {
    /// Compile with default options, continuing after `args`.
    fn to_sql_with_args(&self, dialect: Dialect, args: Vec<Value>) -> QueryResult<Compiled> {
        self.compile(&CompileContext::new(dialect), args)
    }

    /// Compile with explicit limits.
    fn to_sql_with_options(
        &self,
        dialect: Dialect,
        options: CompileOptions,
        args: Vec<Value>,
    ) -> QueryResult<Compiled> {
        self.compile(&CompileContext::with_options(dialect, options), args)
    }

    /// Compile inside an existing context.
    fn compile(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled>;
}

/// A complete statement: compiled from an empty argument list.
pub trait Statement {
    fn build(&self, ctx: &CompileContext) -> QueryResult<Compiled>;

    fn build_sql(&self, dialect: Dialect) -> QueryResult<Compiled> {
        self.build(&CompileContext::new(dialect))
    }

    fn build_sql_with_options(&self, dialect: Dialect, options: CompileOptions) -> QueryResult<Compiled> {
        self.build(&CompileContext::with_options(dialect, options))
    }
}
