use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;

use pairledger_core::DocumentId;
use pairledger_infra::Warehouse;
use pairledger_inventory::{DocumentDraft, OutgoingRow};

use crate::app::routes::common::respond;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route("/batch", post(create_batch))
        .route("/number/:number", get(get_document_by_number))
        .route("/:id", get(get_document))
}

pub async fn list_documents(Extension(warehouse): Extension<Arc<Warehouse>>) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, |w| w.documents()).await
}

pub async fn create_document(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Json(draft): Json<DocumentDraft>,
) -> axum::response::Response {
    respond(StatusCode::CREATED, warehouse, move |w| w.create_document(draft, Utc::now())).await
}

pub async fn create_batch(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Json(body): Json<dto::ImportRequest<OutgoingRow>>,
) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, move |w| w.import_outgoing(body.rows, Utc::now())).await
}

pub async fn get_document(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DocumentId = match errors::parse_id(&id, "document") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, warehouse, move |w| w.document(id)).await
}

pub async fn get_document_by_number(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(number): Path<String>,
) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, move |w| w.document_by_number(&number)).await
}
