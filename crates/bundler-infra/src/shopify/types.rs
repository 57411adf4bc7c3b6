//! GraphQL documents and wire types for the Admin API.

use serde::{Deserialize, Serialize};

use bundler_types::bundle::BundleDefinition;
use bundler_types::catalog::{CatalogOption, CatalogProduct, ImageRef};

pub const PRODUCT_BUNDLE_CREATE: &str = r#"mutation ProductBundleCreate($input: ProductBundleCreateInput!) {
  productBundleCreate(input: $input) {
    productBundleOperation {
      id
      status
    }
    userErrors {
      field
      message
    }
  }
}"#;

pub const CATALOG_PRODUCTS: &str = r#"query CatalogProducts($ids: [ID!]!) {
  nodes(ids: $ids) {
    ... on Product {
      id
      title
      vendor
      images(first: 5) {
        nodes {
          url
          altText
        }
      }
      options {
        id
        name
        values
      }
    }
  }
}"#;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorMessage {
    pub message: String,
}

// ---------------------------------------------------------------------------
// productBundleCreate
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct BundleCreateVariables<'a> {
    pub input: &'a BundleDefinition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleCreateData {
    pub product_bundle_create: BundleCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleCreatePayload {
    pub product_bundle_operation: Option<OperationNode>,
    #[serde(default)]
    pub user_errors: Vec<UserErrorNode>,
}

#[derive(Debug, Deserialize)]
pub struct OperationNode {
    pub id: Option<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// nodes(ids:)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CatalogVariables<'a> {
    pub ids: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub nodes: Vec<Option<ProductNode>>,
}

/// A `nodes` entry. Non-product ids come back as `{}`, so every field is
/// optional and entries without an `id` are dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub images: Option<ImageConnection>,
    #[serde(default)]
    pub options: Vec<OptionNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageConnection {
    #[serde(default)]
    pub nodes: Vec<ImageNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl ProductNode {
    pub fn into_catalog_product(self) -> Option<CatalogProduct> {
        let id = self.id?;
        Some(CatalogProduct {
            id,
            title: self.title,
            vendor: self.vendor,
            images: self
                .images
                .unwrap_or_default()
                .nodes
                .into_iter()
                .map(|image| ImageRef {
                    url: image.url,
                    alt_text: image.alt_text,
                })
                .collect(),
            options: self
                .options
                .into_iter()
                .map(|option| CatalogOption {
                    id: option.id,
                    name: option.name,
                    values: option.values,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundler_types::bundle::ComponentSpec;

    #[test]
    fn test_bundle_create_variables_use_camel_case() {
        let definition = BundleDefinition {
            title: "Kit".to_string(),
            components: vec![ComponentSpec {
                product_id: "gid://shopify/Product/1".to_string(),
                quantity: 1,
                option_selections: vec![],
            }],
        };
        let body = serde_json::to_value(GraphqlRequest {
            query: PRODUCT_BUNDLE_CREATE,
            variables: BundleCreateVariables { input: &definition },
        })
        .unwrap();

        let component = &body["variables"]["input"]["components"][0];
        assert_eq!(component["productId"], "gid://shopify/Product/1");
        assert!(component["optionSelections"].is_array());
    }

    #[test]
    fn test_empty_node_is_dropped() {
        let data: CatalogData = serde_json::from_str(r#"{"nodes": [{}, null]}"#).unwrap();
        let products: Vec<CatalogProduct> = data
            .nodes
            .into_iter()
            .flatten()
            .filter_map(ProductNode::into_catalog_product)
            .collect();
        assert!(products.is_empty());
    }
}
