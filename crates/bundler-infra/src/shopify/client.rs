//! ShopifyAdminClient -- Admin GraphQL client for bundle creation and
//! catalog lookup.
//!
//! Every call is a POST to `https://{shop}/admin/api/{version}/graphql.json`
//! with the access token in the `X-Shopify-Access-Token` header. The token is
//! wrapped in [`SecretString`] and only exposed while building that header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use bundler_core::platform::{BundlePlatform, ProductCatalog};
use bundler_types::bundle::{BundleDefinition, BundleOperation};
use bundler_types::catalog::CatalogProduct;
use bundler_types::config::BundlerConfig;
use bundler_types::error::PlatformError;

use super::types::{
    BundleCreateData, BundleCreateVariables, CATALOG_PRODUCTS, CatalogData, CatalogVariables,
    GraphqlRequest, GraphqlResponse, PRODUCT_BUNDLE_CREATE, ProductNode,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Admin API client for one shop.
///
/// Deliberately not `Debug`; the token never reaches logs.
pub struct ShopifyAdminClient {
    client: reqwest::Client,
    access_token: SecretString,
    base_url: String,
    api_version: String,
}

impl ShopifyAdminClient {
    pub fn new(
        shop_domain: &str,
        api_version: &str,
        access_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token,
            base_url: format!("https://{}", shop_domain.trim_end_matches('/')),
            api_version: api_version.to_string(),
        })
    }

    /// Build a client from `config.toml` values and a resolved token.
    pub fn from_config(
        config: &BundlerConfig,
        access_token: Option<SecretString>,
    ) -> Result<Self, PlatformError> {
        let shop_domain = config.shop_domain.as_deref().ok_or_else(|| {
            PlatformError::NotConfigured("set shop_domain in config.toml".to_string())
        })?;
        let access_token = access_token.ok_or_else(|| {
            PlatformError::NotConfigured(
                "set BUNDLER_ADMIN_TOKEN or pass --token".to_string(),
            )
        })?;

        Self::new(
            shop_domain,
            &config.api_version,
            access_token,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Override the base URL (scheme + host). Used against mock servers.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/admin/api/{}/graphql.json", self.base_url, self.api_version)
    }

    /// Run one GraphQL document and return its `data`.
    ///
    /// Non-2xx statuses become `Http`, top-level `errors` become `Graphql`
    /// (first message), and a missing `data` becomes `Decode`.
    async fn execute<V, D>(&self, query: &str, variables: V) -> Result<D, PlatformError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint())
            .header(ACCESS_TOKEN_HEADER, self.access_token.expose_secret())
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphqlResponse<D> = response
            .json()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))?;

        if let Some(first) = envelope.errors.into_iter().next() {
            return Err(PlatformError::Graphql(first.message));
        }

        envelope
            .data
            .ok_or_else(|| PlatformError::Decode("response contained no data".to_string()))
    }
}

impl BundlePlatform for ShopifyAdminClient {
    async fn create_bundle(
        &self,
        definition: &BundleDefinition,
    ) -> Result<BundleOperation, PlatformError> {
        tracing::debug!(
            title = %definition.title,
            components = definition.components.len(),
            "productBundleCreate"
        );

        let data: BundleCreateData = self
            .execute(
                PRODUCT_BUNDLE_CREATE,
                BundleCreateVariables { input: definition },
            )
            .await?;
        let payload = data.product_bundle_create;

        if let Some(first) = payload.user_errors.into_iter().next() {
            return Err(PlatformError::UserError {
                field: first.field,
                message: first.message,
            });
        }

        let operation = payload.product_bundle_operation.ok_or_else(|| {
            PlatformError::Decode("productBundleCreate returned no operation".to_string())
        })?;

        Ok(BundleOperation {
            id: operation.id,
            status: operation.status,
        })
    }
}

impl ProductCatalog for ShopifyAdminClient {
    async fn fetch_products(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<CatalogProduct>, PlatformError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let data: CatalogData = self
            .execute(CATALOG_PRODUCTS, CatalogVariables { ids: product_ids })
            .await?;

        let products: Vec<CatalogProduct> = data
            .nodes
            .into_iter()
            .flatten()
            .filter_map(ProductNode::into_catalog_product)
            .collect();

        if products.len() < product_ids.len() {
            tracing::warn!(
                requested = product_ids.len(),
                found = products.len(),
                "some product ids were not found"
            );
        }
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use bundler_types::bundle::{ComponentOptionSelection, ComponentSpec};

    use super::*;

    const GRAPHQL_PATH: &str = "/admin/api/2025-01/graphql.json";

    fn client_for(server: &MockServer) -> ShopifyAdminClient {
        ShopifyAdminClient::new(
            "demo-store.myshopify.com",
            "2025-01",
            SecretString::from("shpat_test_token"),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(server.uri())
    }

    fn definition() -> BundleDefinition {
        BundleDefinition {
            title: "Summer Kit".to_string(),
            components: vec![ComponentSpec {
                product_id: "gid://shopify/Product/1".to_string(),
                quantity: 2,
                option_selections: vec![ComponentOptionSelection {
                    component_option_id: "gid://shopify/ProductOption/10".to_string(),
                    name: "Size".to_string(),
                    values: vec!["M".to_string()],
                }],
            }],
        }
    }

    #[test]
    fn test_endpoint_format() {
        let client = ShopifyAdminClient::new(
            "demo-store.myshopify.com",
            "2025-01",
            SecretString::from("t"),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://demo-store.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }

    #[test]
    fn test_from_config_requires_shop_and_token() {
        let config = BundlerConfig::default();
        assert!(matches!(
            ShopifyAdminClient::from_config(&config, Some(SecretString::from("t"))),
            Err(PlatformError::NotConfigured(_))
        ));

        let config = BundlerConfig {
            shop_domain: Some("demo-store.myshopify.com".to_string()),
            ..BundlerConfig::default()
        };
        assert!(matches!(
            ShopifyAdminClient::from_config(&config, None),
            Err(PlatformError::NotConfigured(_))
        ));
        assert!(ShopifyAdminClient::from_config(&config, Some(SecretString::from("t"))).is_ok());
    }

    #[tokio::test]
    async fn test_create_bundle_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(header("x-shopify-access-token", "shpat_test_token"))
            .and(body_partial_json(serde_json::json!({
                "variables": {
                    "input": {
                        "title": "Summer Kit",
                        "components": [{
                            "productId": "gid://shopify/Product/1",
                            "quantity": 2,
                            "optionSelections": [{
                                "componentOptionId": "gid://shopify/ProductOption/10",
                                "name": "Size",
                                "values": ["M"]
                            }]
                        }]
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "productBundleCreate": {
                        "productBundleOperation": {
                            "id": "gid://shopify/ProductBundleOperation/42",
                            "status": "CREATED"
                        },
                        "userErrors": []
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let operation = client_for(&server).create_bundle(&definition()).await.unwrap();
        assert_eq!(
            operation.id.as_deref(),
            Some("gid://shopify/ProductBundleOperation/42")
        );
        assert_eq!(operation.status, "CREATED");
    }

    #[tokio::test]
    async fn test_create_bundle_surfaces_first_user_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "productBundleCreate": {
                        "productBundleOperation": null,
                        "userErrors": [
                            {"field": ["input", "title"], "message": "Title can't be blank"},
                            {"field": null, "message": "Second error"}
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_bundle(&definition())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Title can't be blank");
        match err {
            PlatformError::UserError { field, .. } => {
                assert_eq!(field, Some(vec!["input".to_string(), "title".to_string()]));
            }
            other => panic!("expected UserError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key or access token"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_bundle(&definition())
            .await
            .unwrap_err();
        match err {
            PlatformError::Http { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_top_level_graphql_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{"message": "Throttled"}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_bundle(&definition())
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Graphql(ref m) if m == "Throttled"));
    }

    #[tokio::test]
    async fn test_fetch_products_maps_nodes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(serde_json::json!({
                "variables": {"ids": ["gid://shopify/Product/1", "gid://shopify/Product/404"]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "nodes": [
                        {
                            "id": "gid://shopify/Product/1",
                            "title": "Beach Towel",
                            "vendor": "Acme",
                            "images": {"nodes": [{"url": "https://cdn.example.com/towel.png", "altText": null}]},
                            "options": [
                                {"id": "gid://shopify/ProductOption/10", "name": "Color", "values": ["Red", "Blue"]}
                            ]
                        },
                        null
                    ]
                }
            })))
            .mount(&server)
            .await;

        let products = client_for(&server)
            .fetch_products(&[
                "gid://shopify/Product/1".to_string(),
                "gid://shopify/Product/404".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(products.len(), 1);
        let towel = &products[0];
        assert_eq!(towel.title, "Beach Towel");
        assert_eq!(towel.images.len(), 1);
        assert!(towel.images[0].alt_text.is_none());
        assert_eq!(towel.options[0].values, vec!["Red".to_string(), "Blue".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_products_empty_ids_skips_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let products = client_for(&server).fetch_products(&[]).await.unwrap();
        assert!(products.is_empty());
    }
}
