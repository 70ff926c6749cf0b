//! Query model for the deserialize path.

use crate::models::value::Value;
use serde::{Deserialize, Serialize};

/// A select statement plus positional parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub sql: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Query {
    /// Create a query with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Add a positional parameter.
    pub fn with_param(mut self, param: Value) -> Self {
        self.params.push(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::new("SELECT * FROM tracks WHERE id = ?").with_param(Value::Int32(7));
        assert_eq!(query.params.len(), 1);
        assert!(query.sql.starts_with("SELECT"));
    }
}
