//! REST API request handlers.

pub mod bundle;
pub mod cart_transform;
