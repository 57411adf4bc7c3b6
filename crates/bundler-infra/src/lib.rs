//! Infrastructure layer for Bundler.
//!
//! Contains implementations of the port traits defined in `bundler-core`:
//! SQLite storage for wizard drafts and bundle records, the Shopify Admin
//! GraphQL client, and the config/data-directory loaders.

pub mod config;
pub mod shopify;
pub mod sqlite;
