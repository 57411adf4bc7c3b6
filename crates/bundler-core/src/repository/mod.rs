//! Repository trait definitions.
//!
//! Implementations live in bundler-infra (e.g., SqliteBundleRepository).

pub mod bundle;
