//! Ports to the commerce platform and the surface.
//!
//! Uses RPITIT (return position `impl Trait` in traits) consistent with all
//! async traits in this project -- no `async_trait` macro.

use std::future::Future;

use bundler_types::bundle::{BundleDefinition, BundleOperation};
use bundler_types::catalog::CatalogProduct;
use bundler_types::error::PlatformError;

/// Read-only product lookup used to seed product selections.
pub trait ProductCatalog: Send + Sync {
    /// Fetch products by id, in the order requested.
    ///
    /// Ids the platform does not know are omitted from the result.
    fn fetch_products(
        &self,
        product_ids: &[String],
    ) -> impl Future<Output = Result<Vec<CatalogProduct>, PlatformError>> + Send;
}

/// Registers bundle definitions with the platform.
pub trait BundlePlatform: Send + Sync {
    /// Submit a bundle definition.
    ///
    /// Returns the platform operation handle, or the first user error the
    /// platform reported.
    fn create_bundle(
        &self,
        definition: &BundleDefinition,
    ) -> impl Future<Output = Result<BundleOperation, PlatformError>> + Send;
}

/// Surface notification capability (toast, console line, log entry...).
pub trait Notifier {
    fn success(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
    }
}
