use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::get,
};

use pairledger_core::RecipientId;
use pairledger_infra::Warehouse;
use pairledger_inventory::RecipientDraft;

use crate::app::errors;
use crate::app::routes::common::respond;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_recipients).post(create_recipient))
        .route(
            "/:id",
            get(get_recipient).put(update_recipient).delete(delete_recipient),
        )
}

pub async fn list_recipients(Extension(warehouse): Extension<Arc<Warehouse>>) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, |w| w.recipients()).await
}

pub async fn create_recipient(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Json(draft): Json<RecipientDraft>,
) -> axum::response::Response {
    respond(StatusCode::CREATED, warehouse, move |w| w.create_recipient(draft)).await
}

pub async fn get_recipient(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecipientId = match errors::parse_id(&id, "recipient") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, warehouse, move |w| w.recipient(id)).await
}

pub async fn update_recipient(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(id): Path<String>,
    Json(draft): Json<RecipientDraft>,
) -> axum::response::Response {
    let id: RecipientId = match errors::parse_id(&id, "recipient") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, warehouse, move |w| w.update_recipient(id, draft)).await
}

pub async fn delete_recipient(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RecipientId = match errors::parse_id(&id, "recipient") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, warehouse, move |w| w.delete_recipient(id)).await
}
