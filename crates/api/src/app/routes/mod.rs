use axum::{
    Router,
    routing::{get, put},
};

pub mod billing;
pub mod products;
pub mod system;
pub mod transfer;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/product", axum::routing::post(products::create_product))
        .route(
            "/product/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/product/:id/stock", put(products::update_stock))
        .route(
            "/billing",
            get(billing::get_billing_history).post(billing::add_billing_record),
        )
        .route("/export", get(transfer::export_inventory))
        .route("/import", axum::routing::post(transfer::import_inventory))
        .route("/stats", get(system::stats))
        .route("/stream", get(system::stream))
}
