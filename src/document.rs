//! Query description documents.
//!
//! A document describes one statement in JSON or TOML, mirroring the AST
//! with nullable members. Converting it checks what the typed AST cannot
//! express on its own: mutually exclusive members set together, `null`
//! fields, and object values.
//!
//! ```json
//! { "select": {
//!     "fields": ["id", { "column": "name", "table": "u" }],
//!     "table": { "name": "users", "alias": "u" },
//!     "where": { "field": "age", "operator": "greater_than", "value": 18 },
//!     "limit": 10 } }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{QueryError, QueryResult};
use crate::field::Field;
use crate::filter::Filter;
use crate::filter_value::FilterValue;
use crate::operator::{Logic, Operator, OperatorClass, SortDirection};
use crate::select::SelectQuery;
use crate::sort::Sort;
use crate::statement::{DeleteQuery, InsertQuery, UpdateQuery};
use crate::table::Table;
use crate::transpiler::Statement;
use crate::value::{Value, ValueKind};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Document {
    Select(SelectDoc),
    Insert(InsertDoc),
    Update(UpdateDoc),
    Delete(DeleteDoc),
}

/// A field as a bare column name or a full description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Column(String),
    Full(FieldDoc),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldDoc {
    pub table: Option<String>,
    pub column: Option<String>,
    pub subquery: Option<Box<SelectDoc>>,
    pub alias: Option<String>,
}

/// A table as a bare name or a full description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableSpec {
    Name(String),
    Full(TableDoc),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableDoc {
    pub name: Option<String>,
    pub subquery: Option<Box<SelectDoc>>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterDoc {
    pub logic: Option<Logic>,
    pub field: Option<FieldSpec>,
    pub operator: Option<Operator>,
    pub value: Option<serde_json::Value>,
    /// Takes precedence over `value`.
    pub subquery: Option<Box<SelectDoc>>,
    pub filters: Vec<Option<FilterDoc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortDoc {
    pub field: String,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectDoc {
    pub fields: Vec<Option<FieldSpec>>,
    pub table: Option<TableSpec>,
    #[serde(rename = "where")]
    pub filter: Option<FilterDoc>,
    pub order_by: Vec<Option<SortDoc>>,
    pub limit: u64,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InsertDoc {
    pub into: String,
    /// Column name to one value per row.
    pub values: BTreeMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assignment {
    pub field: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateDoc {
    pub table: String,
    pub set: Vec<Assignment>,
    #[serde(rename = "where")]
    pub filter: Option<FilterDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeleteDoc {
    pub from: String,
    #[serde(rename = "where")]
    pub filter: Option<FilterDoc>,
}

impl Document {
    pub fn from_json(input: &str) -> QueryResult<Self> {
        serde_json::from_str(input).map_err(|e| QueryError::Document(e.to_string()))
    }

    pub fn from_toml(input: &str) -> QueryResult<Self> {
        toml::from_str(input).map_err(|e| QueryError::Document(e.to_string()))
    }

    /// Read a document, choosing the format by extension (`.toml`, else JSON).
    pub fn from_path(path: &Path) -> QueryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Document::Select(_) => "select",
            Document::Insert(_) => "insert",
            Document::Update(_) => "update",
            Document::Delete(_) => "delete",
        }
    }

    /// Convert into a compilable statement.
    pub fn into_statement(self) -> QueryResult<Box<dyn Statement>> {
        let statement: Box<dyn Statement> = match self {
            Document::Select(doc) => Box::new(SelectQuery::try_from(doc)?),
            Document::Insert(doc) => Box::new(InsertQuery::try_from(doc)?),
            Document::Update(doc) => Box::new(UpdateQuery::try_from(doc)?),
            Document::Delete(doc) => Box::new(DeleteQuery::try_from(doc)?),
        };
        Ok(statement)
    }
}

impl TryFrom<FieldSpec> for Field {
    type Error = QueryError;

    fn try_from(spec: FieldSpec) -> Result<Self, Self::Error> {
        let doc = match spec {
            FieldSpec::Column(name) => return Ok(Field::new(name)),
            FieldSpec::Full(doc) => doc,
        };

        let field = match (doc.column, doc.subquery) {
            (None, None) => return Err(QueryError::ColumnIsRequired),
            (Some(column), Some(_)) if !column.is_empty() => {
                return Err(QueryError::ConflictFieldColumnAndFieldSelectQuery);
            }
            (_, Some(subquery)) => Field::subquery(SelectQuery::try_from(*subquery)?),
            (Some(column), None) => match doc.table {
                Some(table) => Field::new(column).from_table(table),
                None => Field::new(column),
            },
        };

        Ok(Field { alias: doc.alias, ..field })
    }
}

impl TryFrom<TableSpec> for Table {
    type Error = QueryError;

    fn try_from(spec: TableSpec) -> Result<Self, Self::Error> {
        let doc = match spec {
            TableSpec::Name(name) => return Ok(Table::new(name)),
            TableSpec::Full(doc) => doc,
        };

        let table = match (doc.name, doc.subquery) {
            (None, None) => return Err(QueryError::NameIsRequired),
            (Some(name), Some(_)) if !name.is_empty() => {
                return Err(QueryError::ConflictTableNameAndTableSelectQuery);
            }
            (_, Some(subquery)) => Table::subquery(SelectQuery::try_from(*subquery)?),
            (Some(name), None) => Table::new(name),
        };

        Ok(Table { alias: doc.alias, ..table })
    }
}

/// Convert a condition's value, naming the operator when a member cannot
/// be represented.
fn operand(json: serde_json::Value, operator: Option<Operator>) -> QueryResult<Value> {
    let Some(operator) = operator else {
        return Value::try_from(json);
    };

    match json {
        serde_json::Value::Object(_) => Err(QueryError::unsupported_for(ValueKind::Map.name(), operator.name())),
        serde_json::Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let kind = if item.is_array() { ValueKind::List } else { ValueKind::Map };
                match Value::try_from(item) {
                    Ok(value) => values.push(value),
                    Err(QueryError::UnsupportedValueType { .. }) => {
                        return Err(if operator.class() == OperatorClass::Membership {
                            QueryError::unsupported_element_for(kind.name(), operator.name())
                        } else {
                            QueryError::unsupported_for(ValueKind::List.name(), operator.name())
                        });
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(Value::List(values))
        }
        scalar => Value::try_from(scalar),
    }
}

impl TryFrom<FilterDoc> for Filter {
    type Error = QueryError;

    fn try_from(doc: FilterDoc) -> Result<Self, Self::Error> {
        let value = match (doc.subquery, doc.value) {
            (Some(subquery), _) => Some(FilterValue::subquery(SelectQuery::try_from(*subquery)?)),
            (None, Some(json)) => Some(FilterValue::Value(operand(json, doc.operator)?)),
            (None, None) => None,
        };

        let filters = doc
            .filters
            .into_iter()
            .map(|child| child.map(Filter::try_from).transpose())
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(Filter {
            logic: doc.logic,
            field: doc.field.map(Field::try_from).transpose()?,
            operator: doc.operator,
            value,
            filters,
        })
    }
}

impl From<SortDoc> for Sort {
    fn from(doc: SortDoc) -> Self {
        Sort { field: doc.field, direction: doc.direction }
    }
}

impl TryFrom<SelectDoc> for SelectQuery {
    type Error = QueryError;

    fn try_from(doc: SelectDoc) -> Result<Self, Self::Error> {
        let fields = doc
            .fields
            .into_iter()
            .map(|field| field.ok_or(QueryError::FieldIsNil).and_then(Field::try_from))
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(SelectQuery {
            fields,
            table: doc.table.map(Table::try_from).transpose()?,
            filter: doc.filter.map(Filter::try_from).transpose()?,
            sorts: doc.order_by.into_iter().map(|s| s.map(Sort::from)).collect(),
            take: doc.limit,
            alias: doc.alias,
        })
    }
}

impl TryFrom<InsertDoc> for InsertQuery {
    type Error = QueryError;

    fn try_from(doc: InsertDoc) -> Result<Self, Self::Error> {
        let fields_values = doc
            .values
            .into_iter()
            .map(|(column, values)| {
                let values = values
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok((column, values))
            })
            .collect::<QueryResult<BTreeMap<_, _>>>()?;

        Ok(InsertQuery { table: doc.into, fields_values })
    }
}

impl TryFrom<UpdateDoc> for UpdateQuery {
    type Error = QueryError;

    fn try_from(doc: UpdateDoc) -> Result<Self, Self::Error> {
        let mut query = UpdateQuery { table: doc.table, ..UpdateQuery::default() };
        for assignment in doc.set {
            query = query.set(assignment.field, Value::try_from(assignment.value)?);
        }
        query.filter = doc.filter.map(Filter::try_from).transpose()?;
        Ok(query)
    }
}

impl TryFrom<DeleteDoc> for DeleteQuery {
    type Error = QueryError;

    fn try_from(doc: DeleteDoc) -> Result<Self, Self::Error> {
        Ok(DeleteQuery {
            table: doc.from,
            filter: doc.filter.map(Filter::try_from).transpose()?,
        })
    }
}
