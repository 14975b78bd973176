use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use inventrobil_inventory::{ProductDraft, ProductPatch};

use crate::app::dto::{self, ProductView};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let filter = match query.into_filter() {
        Ok(f) => f,
        Err(resp) => return resp,
    };
    let products: Vec<ProductView> = services
        .store()
        .search(&filter)
        .into_iter()
        .map(ProductView::from)
        .collect();
    Json(products).into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().get_product(id) {
        Some(product) => Json(ProductView::from(product)).into_response(),
        None => errors::product_not_found(),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductDraft>, JsonRejection>,
) -> axum::response::Response {
    let draft = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().add_product(draft) {
        Ok(product) => (StatusCode::CREATED, Json(ProductView::from(product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().update_product(id, patch) {
        Ok(Some(product)) => Json(ProductView::from(product)).into_response(),
        Ok(None) => errors::product_not_found(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Deleting an unknown id is a no-op, not an error.
    let deleted = services.store().delete_product(id);
    Json(serde_json::json!({
        "success": true,
        "deleted": deleted,
    }))
    .into_response()
}

pub async fn update_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateStockRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let request = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.store().update_stock(id, request.stock) {
        Some(product) => Json(ProductView::from(product)).into_response(),
        None => errors::product_not_found(),
    }
}
