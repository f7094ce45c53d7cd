//! # simple-query
//!
//! > **Build the tree. Get SQL and its arguments.**
//!
//! simple-query compiles a tree of query nodes (fields, tables, literal or
//! sub-query values, condition trees and select statements) into a
//! parameterized SQL fragment plus the ordered list of arguments to bind.
//!
//! ## Quick Example
//!
//! ```
//! use simple_query::prelude::*;
//!
//! let filter = Filter::and([
//!     Filter::condition("field1", Operator::Equal, "value1"),
//!     Filter::or([
//!         Filter::is_null("field2"),
//!         Filter::condition("field3", Operator::In, [1, 2, 3]),
//!     ]),
//! ]);
//!
//! let (sql, args) = filter.to_sql_with_args(Dialect::Postgres, vec![]).unwrap();
//! assert_eq!(sql, "field1 = $1 and (field2 is null or field3 in ($2, $3, $4))");
//! assert_eq!(args.len(), 4);
//! ```
//!
//! ## Dialects
//!
//! | Dialect    | Placeholder | Range            | like      | not like      |
//! |------------|-------------|------------------|-----------|---------------|
//! | `mysql`    | `?`         | `?, ?, ?`        | `like`    | `not like`    |
//! | `postgres` | `$N`        | `$a, ..., $b`    | `ilike`   | `not ilike`   |

pub mod config;
pub mod context;
pub mod dialect;
pub mod document;
pub mod error;
pub mod field;
pub mod filter;
pub mod filter_value;
pub mod operator;
pub mod select;
pub mod sort;
pub mod statement;
pub mod table;
pub mod transpiler;
pub mod value;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::{CompileContext, CompileOptions};
    pub use crate::dialect::Dialect;
    pub use crate::document::Document;
    pub use crate::error::*;
    pub use crate::field::{Field, FieldSource};
    pub use crate::filter::Filter;
    pub use crate::filter_value::FilterValue;
    pub use crate::operator::{Logic, Operator, SortDirection};
    pub use crate::select::{SelectQuery, select};
    pub use crate::sort::Sort;
    pub use crate::statement::{DeleteQuery, InsertQuery, UpdateQuery, delete, insert, update};
    pub use crate::table::{Table, TableSource};
    pub use crate::transpiler::{Compiled, Statement, ToSqlWithArgs};
    pub use crate::value::{Value, ValueKind};
}

pub use select::select;
pub use statement::{delete, insert, update};
