//! # yamdb-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `yamdb-core` domain models. The schema in `migrations/` carries
//! every storage-level constraint: uniqueness, foreign keys, cascades and
//! the score range.

mod catalog;
mod reviews;
mod users;

use std::str::FromStr;

use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;
use yamdb_core::error::{AppError, Result};

/// Tables in dependency order; used for diagnostics only.
pub const TABLES: [&str; 7] = [
    "categories",
    "genres",
    "titles",
    "title_genres",
    "users",
    "reviews",
    "comments",
];

pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens (or creates) the database at `url` and applies pending migrations.
    ///
    /// In-memory databases live as long as their connection, so they are
    /// pinned to a single connection that is never recycled.
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(db_err)?;
        let repo = Self { pool };
        repo.migrate().await?;
        Ok(repo)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("migration failed: {e}")))?;
        info!("sqlite schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Row count of every table, in `TABLES` order.
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            // Table names come from the fixed list above, never from input.
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;
            debug!("{table}: {count} rows");
            counts.push((table, count));
        }
        Ok(counts)
    }
}

/// Translates driver errors into the constraint they report.
pub(crate) fn db_err(err: sqlx::Error) -> AppError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return AppError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() || db.is_check_violation() {
            return AppError::Integrity(db.message().to_string());
        }
    }
    AppError::Internal(err.to_string())
}

// Helpers for UUID conversion
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn uuid_col(row: &SqliteRow, column: &str) -> Result<Uuid> {
    let blob: Vec<u8> = row.try_get(column).map_err(db_err)?;
    Uuid::from_slice(&blob).map_err(|e| AppError::Internal(format!("bad uuid in {column}: {e}")))
}

pub(crate) fn opt_uuid_col(row: &SqliteRow, column: &str) -> Result<Option<Uuid>> {
    let blob: Option<Vec<u8>> = row.try_get(column).map_err(db_err)?;
    blob.map(|b| {
        Uuid::from_slice(&b).map_err(|e| AppError::Internal(format!("bad uuid in {column}: {e}")))
    })
    .transpose()
}

pub(crate) fn col<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column).map_err(db_err)
}
