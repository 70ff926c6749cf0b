//! Value vocabulary shared by the mapper, the equivalence table, and the
//! driver adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Element type of a list-valued property or parameter.
///
/// Lists travel over the wire as encoded text, so the element type must be
/// declared up front for the decode direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int32,
    Text,
    DateTime,
    Bool,
    Float,
}

/// Declared type of a property, constructor parameter, or result column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Int32,
    Text,
    DateTime,
    Bool,
    Float,
    /// Collection; stored as an encoded text blob on the wire.
    List(ElementType),
    /// A declared type with no database equivalent.
    Custom(String),
}

impl ValueType {
    /// Type used for constructor matching. Lists travel as text, so a
    /// list-typed parameter matches a textual column.
    pub fn normalized(&self) -> ValueType {
        match self {
            ValueType::List(_) => ValueType::Text,
            other => other.clone(),
        }
    }

    /// Check if this is a list type.
    pub fn is_list(&self) -> bool {
        matches!(self, ValueType::List(_))
    }

    /// Element type for list types, `None` otherwise.
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            ValueType::List(element) => Some(*element),
            _ => None,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Int32 => write!(f, "int32"),
            ValueType::Text => write!(f, "text"),
            ValueType::DateTime => write!(f, "datetime"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Float => write!(f, "float"),
            ValueType::List(_) => write!(f, "list"),
            ValueType::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A single column or parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer value
    Int32(i32),
    /// Floating point value
    Float(f32),
    /// Date/time value in UTC
    DateTime(DateTime<Utc>),
    /// String value
    Text(String),
    /// Collection value; encoded to text before it reaches the driver
    List(Vec<Value>),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the type name of this value for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Float(_) => "float",
            Self::DateTime(_) => "datetime",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Borrow the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
