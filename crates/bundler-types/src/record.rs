//! Persisted record of a bundle registered with the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bundle::{BundleDefinition, BundleOperation};

/// A bundle definition that was accepted by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleRecord {
    pub id: Uuid,
    pub title: String,
    pub definition: BundleDefinition,
    pub operation: BundleOperation,
    pub created_at: DateTime<Utc>,
}

impl BundleRecord {
    /// Record a freshly accepted definition.
    pub fn new(definition: BundleDefinition, operation: BundleOperation) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: definition.title.clone(),
            definition,
            operation,
            created_at: Utc::now(),
        }
    }

    pub fn component_count(&self) -> usize {
        self.definition.components.len()
    }
}
