//! Configuration loader for Bundler.
//!
//! Reads `config.toml` from the data directory (`~/.bundler/` in production)
//! and deserializes it into [`BundlerConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use bundler_types::config::BundlerConfig;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "BUNDLER_DATA_DIR";

/// Environment variable holding the Admin API access token.
pub const ADMIN_TOKEN_ENV: &str = "BUNDLER_ADMIN_TOKEN";

/// Resolve the data directory.
///
/// Priority:
/// 1. `BUNDLER_DATA_DIR` environment variable
/// 2. `~/.bundler`
/// 3. `./.bundler` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".bundler");
    }

    PathBuf::from(".bundler")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`BundlerConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> BundlerConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BundlerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BundlerConfig::default();
        }
    };

    match toml::from_str::<BundlerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BundlerConfig::default()
        }
    }
}

/// Pick the Admin API token: an explicit value wins over the environment.
///
/// Blank values are treated as absent.
pub fn resolve_admin_token(explicit: Option<String>) -> Option<SecretString> {
    let non_blank = |token: &String| !token.trim().is_empty();
    explicit
        .filter(non_blank)
        .or_else(|| std::env::var(ADMIN_TOKEN_ENV).ok().filter(non_blank))
        .map(SecretString::from)
}
