//! SQLite bundle record repository.
//!
//! Implements `BundleRepository` from `bundler-core`. The definition is stored
//! as JSON next to a few denormalized columns used for listing.

use sqlx::Row;
use uuid::Uuid;

use bundler_core::repository::bundle::BundleRepository;
use bundler_types::bundle::{BundleDefinition, BundleOperation};
use bundler_types::error::RepositoryError;
use bundler_types::record::BundleRecord;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `BundleRepository`.
pub struct SqliteBundleRepository {
    pool: DatabasePool,
}

impl SqliteBundleRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to `BundleRecord`.
struct BundleRow {
    id: String,
    title: String,
    definition_json: String,
    operation_id: Option<String>,
    operation_status: String,
    created_at: String,
}

impl BundleRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            definition_json: row.try_get("definition_json")?,
            operation_id: row.try_get("operation_id")?,
            operation_status: row.try_get("operation_status")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<BundleRecord, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid bundle id: {e}")))?;
        let definition: BundleDefinition = serde_json::from_str(&self.definition_json)
            .map_err(|e| RepositoryError::Query(format!("invalid definition JSON: {e}")))?;

        Ok(BundleRecord {
            id,
            title: self.title,
            definition,
            operation: BundleOperation {
                id: self.operation_id,
                status: self.operation_status,
            },
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, title, definition_json, operation_id, operation_status, created_at FROM bundles";

impl BundleRepository for SqliteBundleRepository {
    async fn create(&self, record: &BundleRecord) -> Result<BundleRecord, RepositoryError> {
        let definition_json = serde_json::to_string(&record.definition)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO bundles (id, title, component_count, definition_json, operation_id, operation_status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(&record.title)
        .bind(record.component_count() as i64)
        .bind(&definition_json)
        .bind(&record.operation.id)
        .bind(&record.operation.status)
        .bind(format_datetime(&record.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(id = %record.id, title = %record.title, "bundle recorded");
                Ok(record.clone())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("bundle '{}' already exists", record.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<BundleRecord>, RepositoryError> {
        // SQLite treats a negative LIMIT as "no limit".
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?");
        let rows = sqlx::query(&sql)
            .bind(limit.unwrap_or(-1))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                BundleRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_record()
            })
            .collect()
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<BundleRecord>, RepositoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            BundleRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_record()
        })
        .transpose()
    }
}
