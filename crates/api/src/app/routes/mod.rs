use axum::{Router, routing::get};

pub mod box_stock;
pub mod common;
pub mod documents;
pub mod products;
pub mod recipients;
pub mod stock;
pub mod system;
pub mod units;

/// Router for every warehouse endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/stock", stock::router())
        .nest("/units", units::router())
        .nest("/box-stock", box_stock::router())
        .nest("/documents", documents::router())
        .nest("/recipients", recipients::router())
        .nest("/products", products::router())
}
