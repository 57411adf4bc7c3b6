//! Business logic and port trait definitions for Bundler.
//!
//! This crate owns the bundle wizard (step validation, state machine,
//! assembly) and the cart transform. It defines the "ports" (catalog,
//! platform, persistence traits) that the infrastructure layer implements,
//! and depends only on `bundler-types` -- never on `bundler-infra` or any
//! database/IO crate.

pub mod cart_transform;
pub mod platform;
pub mod repository;
pub mod wizard;
