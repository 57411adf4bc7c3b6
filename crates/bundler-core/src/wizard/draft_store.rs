//! Wizard draft persistence trait.
//!
//! Defines `WizardDraftStore` for saving and restoring wizard sessions. When
//! the user interrupts the CLI wizard, the last snapshot is still on disk and
//! `bundler create --resume` picks it back up.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use bundler_types::error::RepositoryError;
use bundler_types::wizard::WizardSnapshot;

/// Current shape of the serialized `WizardSnapshot`.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// A saved wizard session.
///
/// `state_json` holds the serialized `WizardSnapshot`; `schema_version`
/// records which shape it was written with.
#[derive(Debug, Clone)]
pub struct WizardDraft {
    pub session_id: Uuid,
    pub state_json: String,
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardDraft {
    /// Serialize a snapshot into a draft row.
    ///
    /// `created_at` should be carried over from the previous save of the same
    /// session; pass `None` on first save.
    pub fn from_snapshot(
        session_id: Uuid,
        snapshot: &WizardSnapshot,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Self, serde_json::Error> {
        let now = Utc::now();
        Ok(Self {
            session_id,
            state_json: serde_json::to_string(snapshot)?,
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        })
    }

    pub fn snapshot(&self) -> Result<WizardSnapshot, serde_json::Error> {
        serde_json::from_str(&self.state_json)
    }
}

/// Lightweight summary for listing drafts without deserializing the snapshot.
#[derive(Debug, Clone)]
pub struct WizardDraftSummary {
    pub session_id: Uuid,
    /// Bundle name typed so far (may be empty).
    pub bundle_name: String,
    /// 1-based step the session was on.
    pub step: usize,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

pub trait WizardDraftStore: Send + Sync {
    /// Save or update a draft (upsert on session_id).
    fn save_draft(
        &self,
        draft: WizardDraft,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Returns `None` if no draft exists for the given session.
    fn load_draft(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<Option<WizardDraft>, RepositoryError>> + Send;

    /// Most recently touched first.
    fn list_drafts(
        &self,
    ) -> impl Future<Output = Result<Vec<WizardDraftSummary>, RepositoryError>> + Send;

    /// No-op if the draft does not exist.
    fn delete_draft(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundler_types::bundle::BundleDraft;
    use bundler_types::config::WizardConfig;
    use bundler_types::wizard::FieldErrors;
    use chrono::NaiveDate;

    #[test]
    fn test_draft_snapshot_roundtrip() {
        let snapshot = WizardSnapshot {
            config: WizardConfig::default(),
            step: 2,
            draft: BundleDraft::starting_on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
                .with_name("Gift Box"),
            errors: FieldErrors::new(),
            errors_visible: false,
        };

        let id = Uuid::now_v7();
        let draft = WizardDraft::from_snapshot(id, &snapshot, None).unwrap();
        assert_eq!(draft.session_id, id);
        assert_eq!(draft.schema_version, SNAPSHOT_SCHEMA_VERSION);
        assert_eq!(draft.created_at, draft.updated_at);
        assert_eq!(draft.snapshot().unwrap(), snapshot);
    }

    #[test]
    fn test_created_at_is_carried_over() {
        let snapshot = WizardSnapshot {
            config: WizardConfig::default(),
            step: 1,
            draft: BundleDraft::default(),
            errors: FieldErrors::new(),
            errors_visible: false,
        };
        let first_saved = Utc::now() - chrono::Duration::minutes(5);
        let draft = WizardDraft::from_snapshot(Uuid::now_v7(), &snapshot, Some(first_saved)).unwrap();
        assert_eq!(draft.created_at, first_saved);
        assert!(draft.updated_at > first_saved);
    }
}
