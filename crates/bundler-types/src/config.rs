//! Global configuration types for Bundler.
//!
//! `BundlerConfig` represents the top-level `config.toml` that points the
//! Admin API client at a shop and shapes the wizard.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.bundler/config.toml`. All fields have sensible defaults;
/// `shop_domain` must be set before bundles can be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlerConfig {
    /// Shop domain, e.g. `my-store.myshopify.com`.
    #[serde(default)]
    pub shop_domain: Option<String>,

    /// Admin API version segment used in the GraphQL endpoint.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for Admin API calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub wizard: WizardConfig,
}

fn default_api_version() -> String {
    "2025-01".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            shop_domain: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            wizard: WizardConfig::default(),
        }
    }
}

/// Wizard shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Insert a dedicated option/variant refinement step after product
    /// selection.
    #[serde(default)]
    pub variant_step: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = BundlerConfig::default();
        assert!(config.shop_domain.is_none());
        assert_eq!(config.api_version, "2025-01");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.wizard.variant_step);
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: BundlerConfig = toml::from_str("").unwrap();
        assert_eq!(config, BundlerConfig::default());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
shop_domain = "my-store.myshopify.com"
api_version = "2024-10"
request_timeout_secs = 10

[wizard]
variant_step = true
"#;
        let config: BundlerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shop_domain.as_deref(), Some("my-store.myshopify.com"));
        assert_eq!(config.api_version, "2024-10");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.wizard.variant_step);
    }
}
