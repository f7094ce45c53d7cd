use crate::error::{QueryError, QueryResult};
use crate::operator::SortDirection;

/// One `order by` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    /// `asc` when absent.
    pub direction: Option<SortDirection>,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction: Some(direction) }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    pub fn to_sql(&self) -> QueryResult<String> {
        if self.field.is_empty() {
            return Err(QueryError::FieldIsRequired);
        }
        let direction = self.direction.unwrap_or_default();
        Ok(format!("{} {}", self.field, direction.keyword()))
    }
}

impl From<&str> for Sort {
    fn from(field: &str) -> Self {
        Self { field: field.to_string(), direction: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort() {
        assert_eq!(Sort::desc("created_at").to_sql().unwrap(), "created_at desc");
        assert_eq!(Sort::from("id").to_sql().unwrap(), "id asc");
        assert_eq!(Sort::asc("").to_sql(), Err(QueryError::FieldIsRequired));
    }
}
