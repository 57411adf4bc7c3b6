//! Shopify Admin GraphQL integration.
//!
//! `ShopifyAdminClient` implements both `BundlePlatform` (the
//! `productBundleCreate` mutation) and `ProductCatalog` (a `nodes(ids:)`
//! product lookup) from `bundler-core`.

pub mod client;
pub mod types;

pub use client::ShopifyAdminClient;
