//! Bundle record handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use bundler_core::repository::bundle::BundleRepository;
use bundler_types::record::BundleRecord;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BundleListQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/bundles - Bundles created through the wizard, newest first.
pub async fn list_bundles(
    State(state): State<AppState>,
    Query(query): Query<BundleListQuery>,
) -> Result<Json<ApiResponse<Vec<BundleRecord>>>, AppError> {
    let start = Instant::now();

    if matches!(query.limit, Some(limit) if limit < 1) {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let bundles = state.bundle_repo.list(query.limit).await?;
    Ok(Json(
        ApiResponse::list(bundles, start).with_link("self", "/api/v1/bundles"),
    ))
}

/// GET /api/v1/bundles/{id}
pub async fn get_bundle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BundleRecord>>, AppError> {
    let start = Instant::now();

    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::Validation(format!("'{id}' is not a valid bundle id")))?;
    let bundle = state
        .bundle_repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bundle {id} not found")))?;

    Ok(Json(
        ApiResponse::success(bundle, start)
            .with_link("self", format!("/api/v1/bundles/{id}"))
            .with_link("collection", "/api/v1/bundles"),
    ))
}
