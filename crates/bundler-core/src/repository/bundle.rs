//! Bundle record repository trait definition.

use uuid::Uuid;

use bundler_types::error::RepositoryError;
use bundler_types::record::BundleRecord;

/// Persistence for bundles the platform accepted.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait BundleRepository: Send + Sync {
    /// Store a new record. Returns `Conflict` if the id already exists.
    fn create(
        &self,
        record: &BundleRecord,
    ) -> impl std::future::Future<Output = Result<BundleRecord, RepositoryError>> + Send;

    /// Newest first, at most `limit` rows when given.
    fn list(
        &self,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<BundleRecord>, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<BundleRecord>, RepositoryError>> + Send;
}
