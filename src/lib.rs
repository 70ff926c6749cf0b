//! rowmap
//!
//! Maps rows returned by a relational query into typed domain objects, and
//! typed domain objects back into parameterized insert statements, without
//! hand-written mapping code per type. Types register a schema descriptor
//! once (see [`Entity`]); the mapper resolves the best-matching constructor
//! against whatever columns a result actually delivered, marshals the values
//! through, and patches manually-flagged properties in afterwards.
//!
//! Statement execution is delegated to sqlx through thin adapters for two
//! backends: networked (MySQL) and embedded (SQLite).

pub mod db;
pub mod descriptor;
pub mod equivalence;
pub mod error;
pub mod mapper;
pub mod models;

pub use db::{Backend, ColumnDescriptor, DbPool, Row, RowSet};
pub use descriptor::{ConnectionDescriptor, MySqlDescriptor, SqliteDescriptor};
pub use equivalence::TypeEquivalence;
pub use error::{MapError, MapResult};
pub use mapper::{ObjectMapper, SchemaGenerator};
pub use models::{
    Arguments, ConstructorTag, ElementType, Entity, Query, TypeSchema, Value, ValueType,
};
