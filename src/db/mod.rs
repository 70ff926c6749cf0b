//! Driver adapters.
//!
//! The mapper owns every mapping decision; this layer delegates execution to
//! sqlx with one submodule per backend:
//! - `mysql`: networked backend
//! - `sqlite`: embedded backend
//!
//! Each submodule provides identical functionality adapted to the backend's
//! type system. No operation here retries, times out, or cancels; that is
//! left to the caller.

pub mod list;
pub mod mysql;
pub mod row;
pub mod sqlite;

pub use row::{ColumnDescriptor, Row, RowSet, find_column};

use crate::descriptor::ConnectionDescriptor;
use crate::error::{MapError, MapResult};
use crate::models::value::Value;
use sqlx::{MySqlPool, SqlitePool};
use tracing::info;

/// Backend flavor of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    /// Get the display name for this backend.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Database-specific connection pool.
#[derive(Debug, Clone)]
pub enum DbPool {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Open a pool for the backend the descriptor describes.
    pub async fn connect(descriptor: &ConnectionDescriptor) -> MapResult<Self> {
        let pool = match descriptor {
            ConnectionDescriptor::MySql(d) => Self::MySql(mysql::connect(d).await?),
            ConnectionDescriptor::Sqlite(d) => Self::Sqlite(sqlite::connect(d).await?),
        };
        info!(backend = %pool.backend(), "connected");
        Ok(pool)
    }

    /// Get the backend flavor of this pool.
    pub fn backend(&self) -> Backend {
        match self {
            DbPool::MySql(_) => Backend::MySql,
            DbPool::Sqlite(_) => Backend::Sqlite,
        }
    }

    /// Check if the pool is open.
    pub fn is_open(&self) -> bool {
        match self {
            DbPool::MySql(pool) => !pool.is_closed(),
            DbPool::Sqlite(pool) => !pool.is_closed(),
        }
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        match self {
            DbPool::MySql(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }

    /// Execute a query and return its result set.
    pub async fn fetch(&self, sql: &str, params: &[Value]) -> MapResult<RowSet> {
        ensure_encoded(params)?;
        match self {
            DbPool::MySql(pool) => mysql::fetch(pool, sql, params).await,
            DbPool::Sqlite(pool) => sqlite::fetch(pool, sql, params).await,
        }
    }

    /// Execute a non-query statement, returning affected rows.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> MapResult<u64> {
        ensure_encoded(params)?;
        match self {
            DbPool::MySql(pool) => mysql::execute(pool, sql, params).await,
            DbPool::Sqlite(pool) => sqlite::execute(pool, sql, params).await,
        }
    }

    /// Execute one statement inside its own transaction, rolling back before
    /// any execution error propagates.
    pub async fn execute_transactional(&self, sql: &str, params: &[Value]) -> MapResult<u64> {
        ensure_encoded(params)?;
        match self {
            DbPool::MySql(pool) => mysql::execute_transactional(pool, sql, params).await,
            DbPool::Sqlite(pool) => sqlite::execute_transactional(pool, sql, params).await,
        }
    }
}

/// Lists must be encoded to their text form before reaching a driver.
fn ensure_encoded(params: &[Value]) -> MapResult<()> {
    match params.iter().position(|p| matches!(p, Value::List(_))) {
        Some(index) => Err(MapError::list_encoding(format!(
            "parameter {} is an unencoded list",
            index
        ))),
        None => Ok(()),
    }
}
