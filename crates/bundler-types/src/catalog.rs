//! Catalog product shapes as returned by the platform's product lookup.

use serde::{Deserialize, Serialize};

/// A product image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// One option of a catalog product (e.g. "Size" with its values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: String,
    pub name: String,
    pub values: Vec<String>,
}

/// A product as supplied by the catalog lookup.
///
/// This is the read-only source the wizard seeds its product selections
/// from; it is never mutated by Bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub options: Vec<CatalogOption>,
}
