use serde::Serialize;
use std::fmt;

use crate::error::{QueryError, QueryResult};

/// A bound argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer (every signed width widens to this)
    Int(i64),
    /// Unsigned integer (every unsigned width widens to this)
    UInt(u64),
    /// Float (both widths widen to this)
    Float(f64),
    /// String
    String(String),
    /// Sequence of values, only accepted by `in`/`not in`
    List(Vec<Value>),
}

/// Runtime classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    String,
    List,
    /// Only produced for objects found in description documents.
    Map,
}

impl ValueKind {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int64",
            ValueKind::UInt => "uint64",
            ValueKind::Float => "float64",
            ValueKind::String => "string",
            ValueKind::List => "slice",
            ValueKind::Map => "map",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueKind::Bool | ValueKind::Int | ValueKind::UInt | ValueKind::Float | ValueKind::String
        )
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, ValueKind::List)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Flatten a sequence into its scalar elements, preserving order.
    ///
    /// Fails on a non-sequence and on any element that is not a scalar
    /// (nested lists and nulls included).
    pub fn scalar_elements(&self) -> QueryResult<&[Value]> {
        let Value::List(items) = self else {
            return Err(QueryError::UnsupportedValueType { kind: self.kind().name() });
        };
        if let Some(bad) = items.iter().find(|v| !v.kind().is_scalar()) {
            return Err(QueryError::UnsupportedValueType { kind: bad.kind().name() });
        }
        Ok(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::$variant(n as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int as i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt as u64: u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = QueryError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<QueryResult<Vec<_>>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(QueryError::UnsupportedValueType { kind: ValueKind::Map.name() });
            }
        })
    }
}
