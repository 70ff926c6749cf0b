//! Data models for rowmap.
//!
//! This module re-exports all model types used throughout the crate.

pub mod query;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use query::Query;
pub use schema::{
    Arguments, ConstructorCandidate, ConstructorTag, Entity, Parameter, Property, TypeSchema,
    TypeSchemaBuilder,
};
pub use value::{ElementType, Value, ValueType};
