//! Cart transform over HTTP.

use axum::http::header;
use axum::response::IntoResponse;

use bundler_core::cart_transform;

use crate::http::error::AppError;

/// POST /api/v1/cart-transform/run - Expand bundle lines in a cart.
///
/// Takes the platform's cart input and answers with the raw
/// `{"operations": [...]}` output, not the envelope.
pub async fn run_cart_transform(body: String) -> Result<impl IntoResponse, AppError> {
    let output = cart_transform::run(&body)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], output))
}
