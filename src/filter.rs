//! Boolean condition trees.
//!
//! A [`Filter`] is either a *logic node* (`logic` + `filters`) or a
//! *condition leaf* (`field` + `operator` + optional `value`). The shape is
//! checked by [`Filter::validate`] before any SQL is produced, so a tree
//! either compiles completely or not at all.
//!
//! ```
//! use simple_query::prelude::*;
//!
//! let filter = Filter::and([
//!     Filter::condition("age", Operator::GreaterThanOrEqual, 18),
//!     Filter::condition("name", Operator::Like, "ann"),
//! ]);
//! let (sql, args) = filter.to_sql_with_args(Dialect::Postgres, vec![]).unwrap();
//! assert_eq!(sql, "age >= $1 and name ilike concat('%', $2, '%')");
//! assert_eq!(args.len(), 2);
//! ```

use crate::context::CompileContext;
use crate::error::{QueryError, QueryResult};
use crate::field::Field;
use crate::filter_value::FilterValue;
use crate::operator::{Logic, Operator, OperatorClass};
use crate::transpiler::{Compiled, ToSqlWithArgs};
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    pub logic: Option<Logic>,
    pub field: Option<Field>,
    pub operator: Option<Operator>,
    pub value: Option<FilterValue>,
    /// Children of a logic node. `None` entries are skipped.
    pub filters: Vec<Option<Filter>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaf comparing `field` against a bound value.
    pub fn condition(field: impl Into<Field>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::condition_with(field, operator, FilterValue::Value(value.into()))
    }

    /// Leaf comparing `field` against a literal or a sub-query.
    pub fn condition_with(field: impl Into<Field>, operator: Operator, value: FilterValue) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator),
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn is_null(field: impl Into<Field>) -> Self {
        Self::check(field, Operator::IsNull)
    }

    pub fn is_not_null(field: impl Into<Field>) -> Self {
        Self::check(field, Operator::IsNotNull)
    }

    /// Leaf without a value.
    pub fn check(field: impl Into<Field>, operator: Operator) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator),
            ..Self::default()
        }
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::new().set_logic(Logic::And).add_filters(filters)
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::new().set_logic(Logic::Or).add_filters(filters)
    }

    pub fn set_logic(mut self, logic: Logic) -> Self {
        self.logic = Some(logic);
        self
    }

    pub fn set_condition(mut self, field: impl Into<Field>, operator: Operator, value: impl Into<Value>) -> Self {
        self.field = Some(field.into());
        self.operator = Some(operator);
        self.value = Some(FilterValue::Value(value.into()));
        self
    }

    /// Append a condition leaf as a child.
    pub fn add_filter(mut self, field: impl Into<Field>, operator: Operator, value: impl Into<Value>) -> Self {
        self.filters.push(Some(Filter::condition(field, operator, value)));
        self
    }

    pub fn add_filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters.into_iter().map(Some));
        self
    }

    /// Append a child slot that may be empty.
    pub fn add_optional(mut self, filter: Option<Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_nil())
    }

    /// Check the shape of the whole tree.
    pub fn validate(&self, ctx: &CompileContext) -> QueryResult<()> {
        match self.logic {
            Some(_) => {
                if self.field.is_some() {
                    return Err(QueryError::FieldIsNotEmpty);
                }
                if self.operator.is_some() {
                    return Err(QueryError::OperatorIsNotEmpty);
                }
                if self.has_value() {
                    return Err(QueryError::ValueIsNotNil);
                }
                if self.filters.is_empty() {
                    return Err(QueryError::FiltersIsRequired);
                }
            }
            None if !self.filters.is_empty() => return Err(QueryError::LogicIsRequired),
            None => self.validate_condition()?,
        }

        if self.filters.iter().any(Option::is_some) {
            let child_ctx = ctx.descend()?;
            for child in self.filters.iter().flatten() {
                child.validate(&child_ctx)?;
            }
        }

        Ok(())
    }

    fn validate_condition(&self) -> QueryResult<()> {
        if self.field.is_none() {
            return Err(QueryError::FieldIsRequired);
        }
        let Some(operator) = self.operator else {
            return Err(QueryError::OperatorIsRequired);
        };

        let class = operator.class();
        if class == OperatorClass::NullCheck {
            if self.has_value() {
                return Err(QueryError::ValueIsNotNil);
            }
            return Ok(());
        }

        let value = match &self.value {
            Some(FilterValue::Subquery(_)) => return Ok(()),
            Some(FilterValue::Value(value)) if !value.is_null() => value,
            _ => return Err(QueryError::ValueIsRequired),
        };

        let kind = value.kind();
        match class {
            OperatorClass::Comparison if !kind.is_scalar() => {
                Err(QueryError::unsupported_for(kind.name(), operator.name()))
            }
            OperatorClass::Pattern if kind != ValueKind::String => {
                Err(QueryError::unsupported_for(kind.name(), operator.name()))
            }
            OperatorClass::Membership => {
                let Value::List(items) = value else {
                    return Err(QueryError::unsupported_for(kind.name(), operator.name()));
                };
                if items.is_empty() {
                    return Err(QueryError::ValueIsRequired);
                }
                match items.iter().find(|item| !item.kind().is_scalar()) {
                    Some(bad) => Err(QueryError::unsupported_element_for(bad.kind().name(), operator.name())),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    /// Validate and compile as a nested child: a logic node is wrapped in
    /// parentheses.
    pub fn compile_nested(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        self.validate(ctx)?;
        self.compile_node(ctx, args, false)
    }

    fn compile_node(&self, ctx: &CompileContext, args: Vec<Value>, is_root: bool) -> QueryResult<Compiled> {
        if let Some(operator) = self.operator {
            return self.compile_condition(operator, ctx, args);
        }

        if self.filters.is_empty() {
            return Ok((String::new(), args));
        }

        let child_ctx = ctx.descend()?;
        let mut args = args;
        let mut parts = Vec::with_capacity(self.filters.len());
        for (i, child) in self.filters.iter().enumerate() {
            let Some(child) = child else {
                tracing::trace!(index = i, "skipping empty filter child");
                continue;
            };
            let (sql, next) = child.compile_node(&child_ctx, args, false)?;
            args = next;
            if !sql.is_empty() {
                parts.push(sql);
            }
        }

        if parts.is_empty() {
            return Ok((String::new(), args));
        }

        let joined = parts.join(&format!(" {} ", self.logic.unwrap_or_default()));
        if is_root {
            Ok((joined, args))
        } else {
            Ok((format!("({})", joined), args))
        }
    }

    fn compile_condition(&self, operator: Operator, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        let field = self.field.as_ref().ok_or(QueryError::FieldIsRequired)?;
        let (column, args) = field.compile(ctx, args)?;
        let dialect = ctx.dialect;

        match operator.class() {
            OperatorClass::NullCheck => Ok((format!("{} {}", column, operator.symbol()), args)),
            OperatorClass::Comparison => {
                let (rhs, args) = self.bind_value(ctx, args)?;
                Ok((format!("{} {} {}", column, operator.symbol(), rhs), args))
            }
            OperatorClass::Pattern => {
                let (rhs, args) = self.bind_value(ctx, args)?;
                let like = dialect.like_operator(operator == Operator::NotLike);
                Ok((format!("{} {} concat('%', {}, '%')", column, like, rhs), args))
            }
            OperatorClass::Membership => match &self.value {
                Some(value @ FilterValue::Subquery(_)) => {
                    let (sql, args) = value.compile(ctx, args)?;
                    Ok((format!("{} {} {}", column, operator.symbol(), sql), args))
                }
                Some(FilterValue::Value(value)) => {
                    let items = match value {
                        Value::List(_) => value.scalar_elements().map_err(|err| match err {
                            QueryError::UnsupportedValueType { kind } => {
                                QueryError::unsupported_element_for(kind, operator.name())
                            }
                            other => other,
                        })?,
                        other => return Err(QueryError::unsupported_for(other.kind().name(), operator.name())),
                    };

                    let mut args = args;
                    args.extend(items.iter().cloned());
                    let end = args.len();
                    let placeholders = dialect.placeholder(end + 1 - items.len(), end);
                    Ok((format!("{} {} ({})", column, operator.symbol(), placeholders), args))
                }
                None => Err(QueryError::ValueIsRequired),
            },
        }
    }

    /// Right-hand side of a single-value condition: a placeholder for the
    /// argument just bound, or the inline sub-query.
    fn bind_value(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        let value = self.value.as_ref().ok_or(QueryError::ValueIsRequired)?;
        let (sql, args) = value.compile(ctx, args)?;
        match value {
            FilterValue::Subquery(_) => Ok((sql, args)),
            FilterValue::Value(_) => Ok((ctx.dialect.last_placeholder(args.len()), args)),
        }
    }
}

impl ToSqlWithArgs for Filter {
    /// Root compilation: the outermost logic node is not parenthesized.
    fn compile(&self, ctx: &CompileContext, args: Vec<Value>) -> QueryResult<Compiled> {
        self.validate(ctx)?;
        self.compile_node(ctx, args, true)
    }
}
