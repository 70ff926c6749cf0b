//! Error types for rowmap.
//!
//! This module defines all error types using `thiserror` for ergonomic error
//! handling. Each variant identifies which contract was violated so callers
//! can match on the failure category instead of parsing messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    /// Malformed or missing required input (descriptor fields, table names).
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// An operation was started in a state it does not support.
    #[error("Precondition violated: {message}")]
    Precondition { message: String },

    /// No registered constructor of the type matches the available columns.
    #[error("No constructor of '{type_name}' matches the available columns")]
    NoMatchingConstructor { type_name: String },

    /// An empty result set needs a default instance the type does not supply.
    #[error("'{type_name}' has no default constructor for an empty result set")]
    NoDefaultConstructor { type_name: String },

    /// A property's declared type has no column type equivalent.
    #[error("No column type equivalent for property '{property}'")]
    NoTypeMapping { property: String },

    /// A list value could not be encoded to or decoded from its text form.
    #[error("Malformed list encoding: {message}")]
    ListEncoding { message: String },

    /// A bound column is absent from the result set.
    #[error("Column '{column}' is not present in the result set")]
    MissingColumn { column: String },

    /// A type's builder rejected the assembled constructor arguments.
    #[error("Cannot build '{type_name}': {message}")]
    Construction { type_name: String, message: String },

    /// Connection descriptor text that does not match either backend shape.
    #[error("Malformed connection string: {message}")]
    MalformedConnectionString { message: String },

    /// Failure surfaced by the underlying database driver.
    #[error("Driver error: {message}")]
    Driver { message: String },
}

impl MapError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Create a no-matching-constructor error.
    pub fn no_matching_constructor(type_name: impl Into<String>) -> Self {
        Self::NoMatchingConstructor {
            type_name: type_name.into(),
        }
    }

    /// Create a no-default-constructor error.
    pub fn no_default_constructor(type_name: impl Into<String>) -> Self {
        Self::NoDefaultConstructor {
            type_name: type_name.into(),
        }
    }

    /// Create a no-type-mapping error.
    pub fn no_type_mapping(property: impl Into<String>) -> Self {
        Self::NoTypeMapping {
            property: property.into(),
        }
    }

    /// Create a list encoding error.
    pub fn list_encoding(message: impl Into<String>) -> Self {
        Self::ListEncoding {
            message: message.into(),
        }
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a construction error.
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a malformed connection string error.
    pub fn malformed_connection_string(message: impl Into<String>) -> Self {
        Self::MalformedConnectionString {
            message: message.into(),
        }
    }

    /// Create a driver error.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Check if this error came from the resolution phase.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingConstructor { .. } | Self::NoDefaultConstructor { .. }
        )
    }
}

/// Convert sqlx errors to MapError.
impl From<sqlx::Error> for MapError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => {
                MapError::driver(format!("configuration: {}", msg))
            }
            sqlx::Error::Database(db_err) => MapError::driver(db_err.message().to_string()),
            sqlx::Error::Io(io_err) => MapError::driver(format!("I/O: {}", io_err)),
            sqlx::Error::Tls(tls_err) => MapError::driver(format!("TLS: {}", tls_err)),
            sqlx::Error::Protocol(msg) => MapError::driver(format!("protocol: {}", msg)),
            sqlx::Error::PoolClosed => MapError::precondition("connection pool is closed"),
            sqlx::Error::ColumnNotFound(col) => MapError::missing_column(col),
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => MapError::driver(format!(
                "column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                MapError::driver(format!("failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => MapError::driver(format!("decode: {}", source)),
            other => MapError::driver(other.to_string()),
        }
    }
}

/// Convert list codec JSON errors to MapError.
impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::list_encoding(err.to_string())
    }
}

/// Result type alias for mapping operations.
pub type MapResult<T> = Result<T, MapError>;
