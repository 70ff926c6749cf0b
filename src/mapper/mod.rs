//! Row ↔ object mapping.
//!
//! [`ObjectMapper`] orchestrates both directions: deserialization resolves a
//! constructor against the columns a result delivered, marshals column values
//! into builder arguments, and patches manually-flagged properties in after
//! construction; serialization enumerates an instance's properties into a
//! positional insert executed inside a scoped transaction.
//!
//! The mapper never processes more than one row per deserialize call.

pub mod ddl;
pub mod resolve;

pub use ddl::SchemaGenerator;

use crate::db::row::ColumnDescriptor;
use crate::db::{DbPool, RowSet, find_column, list};
use crate::equivalence::TypeEquivalence;
use crate::error::{MapError, MapResult};
use crate::models::query::Query;
use crate::models::schema::Entity;
use crate::models::value::{Value, ValueType};
use tracing::debug;

/// Maps result rows into registered types and instances into inserts.
pub struct ObjectMapper {
    pool: DbPool,
    types: TypeEquivalence,
}

impl ObjectMapper {
    /// Create a mapper over a pool with the standard equivalence table.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            types: TypeEquivalence::new(),
        }
    }

    /// Create a mapper with a caller-supplied equivalence table.
    pub fn with_equivalence(pool: DbPool, types: TypeEquivalence) -> Self {
        Self { pool, types }
    }

    /// The pool this mapper executes against.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// The equivalence table in use.
    pub fn equivalence(&self) -> &TypeEquivalence {
        &self.types
    }

    /// Execute the query and deserialize its first row into `T`.
    ///
    /// An empty result yields `T`'s default instance; types without one fail
    /// with [`MapError::NoDefaultConstructor`].
    pub async fn deserialize<T: Entity>(&self, query: &Query) -> MapResult<T> {
        if query.sql.trim().is_empty() {
            return Err(MapError::precondition("query text required"));
        }
        if !self.pool.is_open() {
            return Err(MapError::precondition("connection must be open"));
        }

        debug!(sql = %query.sql, backend = %self.pool.backend(), "executing select");
        let mut rows = self.pool.fetch(&query.sql, &query.params).await?;
        Self::deserialize_rows(&mut rows)
    }

    /// Deserialize from an already-fetched result set.
    ///
    /// Consumes at most one row; remaining rows are left untouched.
    pub fn deserialize_rows<T: Entity>(rows: &mut RowSet) -> MapResult<T> {
        let schema = T::schema();
        let Some(row) = rows.next_row() else {
            return T::default_instance()
                .ok_or_else(|| MapError::no_default_constructor(schema.type_name()));
        };
        let columns = rows.columns();

        // Manual-assignment properties never participate in matching.
        let matchable: Vec<ColumnDescriptor> = columns
            .iter()
            .filter(|column| {
                !schema
                    .manual_properties()
                    .any(|property| property.name.eq_ignore_ascii_case(column.name()))
            })
            .cloned()
            .collect();

        let candidate = resolve::resolve(schema, &matchable)?;

        let mut args = Vec::with_capacity(candidate.param_count());
        for param in candidate.params() {
            // The full column set is scanned here, not the matchable subset.
            // Unmatched parameters stay absent; the builder reports the gap.
            let Some(index) = find_column(columns, param.name) else {
                continue;
            };
            let value = row.value(index).cloned().unwrap_or(Value::Null);
            match (&param.value_type, value) {
                (ValueType::List(element), Value::Text(text)) => {
                    args.push(Value::List(list::decode(&text, *element)?));
                }
                (ValueType::List(_), Value::Null) => args.push(Value::Null),
                (ValueType::List(_), other) => {
                    return Err(MapError::list_encoding(format!(
                        "column '{}' does not hold an encoded list (got {})",
                        param.name,
                        other.type_name()
                    )));
                }
                (_, value) => args.push(value),
            }
        }

        let mut instance = T::construct(candidate.tag(), args)?;

        for property in schema.manual_properties() {
            let column = property.column_name();
            let index =
                find_column(columns, column).ok_or_else(|| MapError::missing_column(column))?;
            let value = row.value(index).cloned().unwrap_or(Value::Null);
            instance.assign(property.name, value)?;
        }

        Ok(instance)
    }

    /// Insert the instance into the table named after its type.
    pub async fn serialize<T: Entity>(&self, instance: &T) -> MapResult<()> {
        self.serialize_as(instance, T::NAME).await
    }

    /// Insert the instance into `table`.
    ///
    /// Columns are assumed to match property declaration order; the statement
    /// runs inside its own transaction and rolls back on failure.
    pub async fn serialize_as<T: Entity>(&self, instance: &T, table: &str) -> MapResult<()> {
        if table.trim().is_empty() {
            return Err(MapError::validation("table name required"));
        }

        let properties = instance.properties();
        let statement = insert_statement(table, properties.len());
        let params = encode_properties(properties)?;

        debug!(sql = %statement, backend = %self.pool.backend(), "executing insert");
        self.pool.execute_transactional(&statement, &params).await?;
        Ok(())
    }

    /// Build a CREATE TABLE statement for `T` using this mapper's
    /// equivalence table.
    pub fn create_table_statement<T: Entity>(&self, table: &str) -> MapResult<String> {
        SchemaGenerator::create_table_statement::<T>(&self.types, table)
    }
}

/// One positional placeholder per property, in declared order.
fn insert_statement(table: &str, property_count: usize) -> String {
    let placeholders = vec!["?"; property_count].join(", ");
    format!("INSERT INTO {} VALUES ({})", table, placeholders)
}

/// Replace list values with their encoded text form; scalars pass through.
fn encode_properties(properties: Vec<(&'static str, Value)>) -> MapResult<Vec<Value>> {
    properties
        .into_iter()
        .map(|(_, value)| match value {
            Value::List(items) => Ok(Value::Text(list::encode(&items)?)),
            other => Ok(other),
        })
        .collect()
}
