//! HTTP/REST API layer for Bundler.
//!
//! Axum-based API at `/api/v1/` with the envelope response format and CORS.
//! The cart transform endpoint answers with the raw function output so it
//! can stand in for the function runner.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
