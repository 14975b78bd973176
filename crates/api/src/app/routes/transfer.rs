use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn export_inventory(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let export = services.store().export_inventory();
    let disposition = format!("attachment; filename=\"{}\"", export.file_name());

    let mut resp = Json(export).into_response();
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        resp.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    resp
}

/// Replace the whole catalog with the `products` array of an export document.
pub async fn import_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> axum::response::Response {
    let doc = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().import_inventory(&doc) {
        Ok(imported) => Json(serde_json::json!({
            "success": true,
            "imported": imported,
        }))
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
