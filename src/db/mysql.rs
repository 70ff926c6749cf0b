//! Networked backend adapter (MySQL).

use crate::db::row::{ColumnDescriptor, Row, RowSet};
use crate::descriptor::MySqlDescriptor;
use crate::error::MapResult;
use crate::models::value::{Value, ValueType};
use chrono::{DateTime, NaiveDateTime, Utc};
use futures_util::StreamExt;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as _, MySql, MySqlPool, Row as _, TypeInfo as _};
use tracing::warn;

/// Open a pool for the server the descriptor describes.
pub(crate) async fn connect(descriptor: &MySqlDescriptor) -> MapResult<MySqlPool> {
    let options = MySqlConnectOptions::new()
        .host(descriptor.server())
        .port(descriptor.port())
        .database(descriptor.database())
        .username(descriptor.uid())
        .password(descriptor.pwd());
    let pool = MySqlPoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

/// Execute a query and collect its rows with column metadata.
pub(crate) async fn fetch(pool: &MySqlPool, sql: &str, params: &[Value]) -> MapResult<RowSet> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = bind_param(query, param);
    }

    let mut stream = query.fetch(pool);
    let mut columns: Vec<ColumnDescriptor> = Vec::new();
    let mut rows = Vec::new();
    while let Some(row) = stream.next().await {
        let row = row?;
        if columns.is_empty() {
            columns = column_descriptors(&row);
        }
        rows.push(decode_row(&row, &columns));
    }
    Ok(RowSet::new(columns, rows))
}

/// Execute a non-query statement.
pub(crate) async fn execute(pool: &MySqlPool, sql: &str, params: &[Value]) -> MapResult<u64> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = bind_param(query, param);
    }
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// Execute one statement inside its own transaction.
pub(crate) async fn execute_transactional(
    pool: &MySqlPool,
    sql: &str,
    params: &[Value],
) -> MapResult<u64> {
    let mut tx = pool.begin().await?;
    let mut query = sqlx::query(sql);
    for param in params {
        query = bind_param(query, param);
    }
    match query.execute(&mut *tx).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result.rows_affected())
        }
        Err(err) => {
            // Roll back before surfacing the execution error.
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback after failed statement also failed");
            }
            Err(err.into())
        }
    }
}

/// Bind a parameter to a MySQL query.
fn bind_param<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    param: &'q Value,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match param {
        Value::Null => query.bind(None::<String>),
        Value::Bool(v) => query.bind(*v),
        Value::Int32(v) => query.bind(*v),
        Value::Float(v) => query.bind(*v),
        Value::DateTime(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.as_str()),
        // Lists are encoded to text before they reach the driver.
        Value::List(_) => query.bind(None::<String>),
    }
}

fn column_descriptors(row: &MySqlRow) -> Vec<ColumnDescriptor> {
    row.columns()
        .iter()
        .map(|col| ColumnDescriptor::new(col.name(), column_value_type(col.type_info().name())))
        .collect()
}

/// Native value type for a MySQL column type name. Types outside the mapped
/// vocabulary are carried as `Custom` and decoded as text.
fn column_value_type(type_name: &str) -> ValueType {
    match type_name.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" => ValueType::Int32,
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" => {
            ValueType::Text
        }
        "DATETIME" | "TIMESTAMP" => ValueType::DateTime,
        "BOOLEAN" => ValueType::Bool,
        "FLOAT" => ValueType::Float,
        other => ValueType::Custom(other.to_string()),
    }
}

fn decode_row(row: &MySqlRow, columns: &[ColumnDescriptor]) -> Row {
    let values = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| decode_column(row, idx, column.value_type()))
        .collect();
    Row::new(values)
}

fn decode_column(row: &MySqlRow, idx: usize, value_type: &ValueType) -> Value {
    match value_type {
        ValueType::Int32 => decode_int32(row, idx),
        ValueType::Bool => row
            .try_get::<Option<bool>, _>(idx)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        ValueType::Float => decode_float(row, idx),
        ValueType::DateTime => decode_datetime(row, idx),
        _ => row
            .try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    }
}

fn decode_int32(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Int32(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Int32(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i8>, _>(idx) {
        return Value::Int32(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        if let Ok(narrowed) = i32::try_from(v) {
            return Value::Int32(narrowed);
        }
    }
    Value::Null
}

fn decode_float(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return Value::Float(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return Value::Float(v as f32);
    }
    Value::Null
}

fn decode_datetime(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(Some(v)) = row.try_get::<Option<DateTime<Utc>>, _>(idx) {
        return Value::DateTime(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return Value::DateTime(v.and_utc());
    }
    Value::Null
}
