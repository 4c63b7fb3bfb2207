use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Query},
    http::StatusCode,
    routing::get,
};

use pairledger_infra::Warehouse;

use crate::app::dto;
use crate::app::routes::common::respond;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stock))
        .route("/summary", get(summary))
}

pub async fn list_stock(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Query(query): Query<dto::StockQuery>,
) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, move |w| w.stock(query.search.as_deref())).await
}

pub async fn summary(Extension(warehouse): Extension<Arc<Warehouse>>) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, |w| w.summary()).await
}
