//! Shared domain types for Bundler.
//!
//! This crate contains the types every other layer speaks: the bundle draft
//! accumulated by the wizard, the platform-ready bundle definition, the cart
//! transform wire shapes, persisted bundle records, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod bundle;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod record;
pub mod wizard;
