use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use pairledger_core::UnitId;
use pairledger_infra::Warehouse;
use pairledger_inventory::UnitStockRow;

use crate::app::routes::common::{respond, with_warehouse};
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_units).post(add_units))
        .route("/import", post(import_units))
        .route("/:id", get(get_unit).put(update_unit).delete(delete_unit))
}

pub async fn list_units(Extension(warehouse): Extension<Arc<Warehouse>>) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, |w| w.units()).await
}

pub async fn add_units(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::AddUnitsRequest>,
) -> axum::response::Response {
    respond(StatusCode::CREATED, warehouse, move |w| {
        w.add_units(body.units, actor.actor(), Utc::now())
    })
    .await
}

pub async fn get_unit(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UnitId = match errors::parse_id(&id, "unit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, warehouse, move |w| w.unit(id)).await
}

pub async fn update_unit(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUnitRequest>,
) -> axum::response::Response {
    let id: UnitId = match errors::parse_id(&id, "unit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let updated = with_warehouse(warehouse, move |w| {
        w.update_unit(body.into_update(id), actor.actor_or_default(), Utc::now())
    })
    .await;

    match updated {
        Ok(updated) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "entry": updated.entry,
                "quantityDifference": updated.quantity_difference,
            })),
        )
            .into_response(),
        Err(resp) => resp,
    }
}

pub async fn delete_unit(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UnitId = match errors::parse_id(&id, "unit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    respond(StatusCode::OK, warehouse, move |w| w.delete_unit(id, Utc::now())).await
}

pub async fn import_units(
    Extension(warehouse): Extension<Arc<Warehouse>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::ImportRequest<UnitStockRow>>,
) -> axum::response::Response {
    respond(StatusCode::OK, warehouse, move |w| {
        w.import_units(body.rows, actor.actor(), Utc::now())
    })
    .await
}
