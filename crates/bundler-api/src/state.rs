//! Application state wiring stores and configuration together.
//!
//! Used by both CLI commands and REST API handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use bundler_infra::config::{load_config, resolve_admin_token, resolve_data_dir};
use bundler_infra::shopify::ShopifyAdminClient;
use bundler_infra::sqlite::bundle::SqliteBundleRepository;
use bundler_infra::sqlite::draft_store::SqliteWizardDraftStore;
use bundler_infra::sqlite::pool::{database_url, DatabasePool};
use bundler_types::config::BundlerConfig;

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: Arc<BundlerConfig>,
    pub bundle_repo: Arc<SqliteBundleRepository>,
    pub draft_store: Arc<SqliteWizardDraftStore>,
}

impl AppState {
    /// Initialize from the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::open(resolve_data_dir()).await
    }

    /// Create the data directory if needed, load `config.toml`, open the
    /// database and run migrations.
    pub async fn open(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("Failed to open the bundler database")?;

        Ok(Self {
            bundle_repo: Arc::new(SqliteBundleRepository::new(db_pool.clone())),
            draft_store: Arc::new(SqliteWizardDraftStore::new(db_pool.clone())),
            config: Arc::new(config),
            data_dir,
        })
    }

    /// Admin API client for the configured shop.
    ///
    /// `token` (from `--token`) wins over `BUNDLER_ADMIN_TOKEN`.
    pub fn admin_client(&self, token: Option<String>) -> anyhow::Result<ShopifyAdminClient> {
        ShopifyAdminClient::from_config(&self.config, resolve_admin_token(token))
            .context("Admin API client is not available")
    }
}
