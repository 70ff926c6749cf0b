//! Result-set surface shared by the driver adapters and the mapper.
//!
//! A [`RowSet`] is a forward-only iterator over fetched rows plus the column
//! metadata the mapper matches constructors against. Driver adapters build
//! row sets from live results; tests build them directly from parts.

use crate::models::value::{Value, ValueType};
use std::collections::VecDeque;

/// Name + native value type for one result-set column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    name: String,
    value_type: ValueType,
}

impl ColumnDescriptor {
    /// Create a column descriptor.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's native value type.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }
}

/// Case-insensitive position of `name` within a column set.
pub fn find_column(columns: &[ColumnDescriptor], name: &str) -> Option<usize> {
    columns
        .iter()
        .position(|column| column.name.eq_ignore_ascii_case(name))
}

/// One fetched row; values align positionally with the column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from positional values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Value at a column position.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Number of values in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Forward-only result iterator with column metadata.
#[derive(Debug)]
pub struct RowSet {
    columns: Vec<ColumnDescriptor>,
    rows: VecDeque<Row>,
}

impl RowSet {
    /// Create a row set from its parts.
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into(),
        }
    }

    /// Column metadata in result-set order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Case-insensitive position of a named column.
    pub fn position(&self, name: &str) -> Option<usize> {
        find_column(&self.columns, name)
    }

    /// Advance to the next row; `None` once the set is drained.
    pub fn next_row(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    /// Number of rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowSet {
        RowSet::new(
            vec![
                ColumnDescriptor::new("Id", ValueType::Int32),
                ColumnDescriptor::new("name", ValueType::Text),
            ],
            vec![
                Row::new(vec![Value::Int32(1), Value::Text("a".to_string())]),
                Row::new(vec![Value::Int32(2), Value::Text("b".to_string())]),
            ],
        )
    }

    #[test]
    fn test_forward_only_iteration() {
        let mut rows = sample();
        assert_eq!(rows.remaining(), 2);
        let first = rows.next_row().unwrap();
        assert_eq!(first.value(0), Some(&Value::Int32(1)));
        assert_eq!(rows.remaining(), 1);
        rows.next_row().unwrap();
        assert!(rows.next_row().is_none());
    }

    #[test]
    fn test_case_insensitive_position() {
        let rows = sample();
        assert_eq!(rows.position("id"), Some(0));
        assert_eq!(rows.position("NAME"), Some(1));
        assert_eq!(rows.position("missing"), None);
    }
}
