use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
};

use pairledger_infra::Warehouse;
use pairledger_inventory::BoxStockRow;

use crate::app::dto;
use crate::app::routes::common::respond;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_box_stock))
        .route("/import", post(import_box_stock))
}

pub async fn list_box_stock(Extension(warehouse): Extension<Arc<Warehouse>>) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, |w| w.box_stock()).await
}

pub async fn import_box_stock(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Json(body): Json<dto::ImportRequest<BoxStockRow>>,
) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, move |w| w.import_box_stock(body.rows)).await
}
