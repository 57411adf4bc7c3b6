//! SQLite implementation of `WizardDraftStore`.
//!
//! Drafts live in the `wizard_drafts` table, upserted with INSERT OR REPLACE.
//! Listing pulls `draft.bundle_name` and `step` out of `state_json` with
//! `serde_json::Value` rather than deserializing the whole snapshot.

use sqlx::Row;
use uuid::Uuid;

use bundler_core::wizard::draft_store::{WizardDraft, WizardDraftStore, WizardDraftSummary};
use bundler_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed wizard draft persistence.
pub struct SqliteWizardDraftStore {
    pool: DatabasePool,
}

impl SqliteWizardDraftStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn parse_session_id(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))
}

/// (bundle name, step) from a serialized snapshot; empty name and step 1
/// when the JSON does not have the expected shape.
fn summary_fields(state_json: &str) -> (String, usize) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(state_json) else {
        return (String::new(), 1);
    };
    let name = value
        .pointer("/draft/bundle_name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let step = value
        .get("step")
        .and_then(|v| v.as_u64())
        .map(|s| s as usize)
        .unwrap_or(1);
    (name, step)
}

impl WizardDraftStore for SqliteWizardDraftStore {
    async fn save_draft(&self, draft: WizardDraft) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO wizard_drafts (session_id, state_json, schema_version, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(draft.session_id.to_string())
        .bind(&draft.state_json)
        .bind(draft.schema_version as i64)
        .bind(format_datetime(&draft.created_at))
        .bind(format_datetime(&draft.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        tracing::debug!(session_id = %draft.session_id, "wizard draft saved");
        Ok(())
    }

    async fn load_draft(&self, session_id: &Uuid) -> Result<Option<WizardDraft>, RepositoryError> {
        let row = sqlx::query(
            "SELECT session_id, state_json, schema_version, created_at, updated_at FROM wizard_drafts WHERE session_id = ?",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sid: String = row.try_get("session_id").map_err(query_err)?;
        let state_json: String = row.try_get("state_json").map_err(query_err)?;
        let schema_version: i64 = row.try_get("schema_version").map_err(query_err)?;
        let created_at: String = row.try_get("created_at").map_err(query_err)?;
        let updated_at: String = row.try_get("updated_at").map_err(query_err)?;

        Ok(Some(WizardDraft {
            session_id: parse_session_id(&sid)?,
            state_json,
            schema_version: schema_version as u32,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }

    async fn list_drafts(&self) -> Result<Vec<WizardDraftSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, state_json, updated_at FROM wizard_drafts ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let sid: String = row.try_get("session_id").map_err(query_err)?;
            let state_json: String = row.try_get("state_json").map_err(query_err)?;
            let updated_at: String = row.try_get("updated_at").map_err(query_err)?;
            let (bundle_name, step) = summary_fields(&state_json);

            summaries.push(WizardDraftSummary {
                session_id: parse_session_id(&sid)?,
                bundle_name,
                step,
                updated_at: parse_datetime(&updated_at)?,
            });
        }

        Ok(summaries)
    }

    async fn delete_draft(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM wizard_drafts WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        Ok(())
    }
}
