use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, put},
};

use pairledger_infra::Warehouse;

use crate::app::dto;
use crate::app::routes::common::respond;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:sku", put(upsert_product))
}

pub async fn list_products(Extension(warehouse): Extension<Arc<Warehouse>>) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, |w| Ok(w.products())).await
}

pub async fn upsert_product(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(sku): Path<String>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, move |w| w.upsert_product(body.into_product(sku))).await
}
