use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::{self, AppServices};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.store().stats())
}

/// Server-sent events for every store mutation.
pub async fn stream(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    services::inventory_sse_stream(services)
}
