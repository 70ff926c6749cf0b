//! Bidirectional equivalence between native value types and column type
//! names.
//!
//! The table is built once at construction and immutable thereafter; the
//! mapper and schema generator hold it by reference. Both lookup directions
//! return `None` for unknown input rather than failing — callers must treat
//! `None` as an error condition.

use crate::models::value::ValueType;
use std::collections::HashMap;

/// Immutable type equivalence table.
#[derive(Debug, Clone)]
pub struct TypeEquivalence {
    from_column: HashMap<&'static str, ValueType>,
}

impl TypeEquivalence {
    /// Build the table with the standard entries.
    pub fn new() -> Self {
        let mut from_column = HashMap::new();
        from_column.insert("INT", ValueType::Int32);
        from_column.insert("INTEGER", ValueType::Int32);
        from_column.insert("TEXT", ValueType::Text);
        from_column.insert("DATETIME", ValueType::DateTime);
        from_column.insert("BOOLEAN", ValueType::Bool);
        from_column.insert("FLOAT", ValueType::Float);
        Self { from_column }
    }

    /// Column type name equivalent to a native value type.
    ///
    /// Lists map one-directionally to TEXT because their wire representation
    /// is an encoded text blob. Custom types have no equivalent.
    pub fn column_type(&self, value_type: &ValueType) -> Option<&'static str> {
        match value_type {
            ValueType::Int32 => Some("INTEGER"),
            ValueType::Text => Some("TEXT"),
            ValueType::DateTime => Some("DATETIME"),
            ValueType::Bool => Some("BOOLEAN"),
            ValueType::Float => Some("FLOAT"),
            ValueType::List(_) => Some("TEXT"),
            ValueType::Custom(_) => None,
        }
    }

    /// Native value type equivalent to a column type name
    /// (case-insensitive). The TEXT → list direction is intentionally not
    /// attempted; callers needing a list must already know the element type.
    pub fn value_type(&self, column_type: &str) -> Option<ValueType> {
        self.from_column
            .get(column_type.to_uppercase().as_str())
            .cloned()
    }
}

impl Default for TypeEquivalence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::value::ElementType;

    #[test]
    fn test_column_type_lookups() {
        let table = TypeEquivalence::new();
        assert_eq!(table.column_type(&ValueType::Int32), Some("INTEGER"));
        assert_eq!(table.column_type(&ValueType::Text), Some("TEXT"));
        assert_eq!(table.column_type(&ValueType::DateTime), Some("DATETIME"));
        assert_eq!(table.column_type(&ValueType::Bool), Some("BOOLEAN"));
        assert_eq!(table.column_type(&ValueType::Float), Some("FLOAT"));
    }

    #[test]
    fn test_list_maps_to_text_one_way() {
        let table = TypeEquivalence::new();
        assert_eq!(
            table.column_type(&ValueType::List(ElementType::Int32)),
            Some("TEXT")
        );
        // The reverse direction resolves TEXT to plain text, never a list.
        assert_eq!(table.value_type("TEXT"), Some(ValueType::Text));
    }

    #[test]
    fn test_custom_type_has_no_equivalent() {
        let table = TypeEquivalence::new();
        assert_eq!(
            table.column_type(&ValueType::Custom("Point3".to_string())),
            None
        );
        assert_eq!(table.value_type("GEOMETRY"), None);
    }

    #[test]
    fn test_value_type_lookups() {
        let table = TypeEquivalence::new();
        assert_eq!(table.value_type("INT"), Some(ValueType::Int32));
        assert_eq!(table.value_type("INTEGER"), Some(ValueType::Int32));
        assert_eq!(table.value_type("integer"), Some(ValueType::Int32));
        assert_eq!(table.value_type("DATETIME"), Some(ValueType::DateTime));
        assert_eq!(table.value_type("BOOLEAN"), Some(ValueType::Bool));
        assert_eq!(table.value_type("FLOAT"), Some(ValueType::Float));
    }
}
