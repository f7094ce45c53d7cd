//! Compilation context shared by every node of a query tree.

use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};

/// Default nesting limit for filters and sub-queries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Deepest filter/sub-query nesting accepted.
    pub max_depth: usize,
    /// Largest `limit` a select may ask for.
    pub max_take: Option<u64>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, max_take: None }
    }
}

/// Dialect plus the current position in the tree.
///
/// Copied (never shared) into each recursive call, so siblings start from
/// the same depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileContext {
    pub dialect: Dialect,
    pub depth: usize,
    pub options: CompileOptions,
}

impl CompileContext {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_options(dialect, CompileOptions::default())
    }

    pub fn with_options(dialect: Dialect, options: CompileOptions) -> Self {
        Self { dialect, depth: 0, options }
    }

    /// Context for a nested filter or embedded sub-query.
    pub fn descend(&self) -> QueryResult<Self> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(QueryError::MaxDepthExceeded(self.options.max_depth));
        }
        Ok(Self { depth, ..*self })
    }
}
