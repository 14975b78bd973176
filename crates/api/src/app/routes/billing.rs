use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use inventrobil_inventory::Sale;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Billing history, newest first.
pub async fn get_billing_history(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    Json(services.store().get_billing_history()).into_response()
}

/// Checkout: decrement stock for every line and record the bill.
pub async fn add_billing_record(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Sale>, JsonRejection>,
) -> axum::response::Response {
    let sale = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().record_sale(sale) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
