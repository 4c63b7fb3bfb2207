use std::sync::Arc;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use pairledger_infra::{LedgerResult, Warehouse};

use crate::app::errors;

/// Run a warehouse call on the blocking pool.
///
/// Ledger stores take std locks and may do file IO, so they never run on the
/// async workers.
pub async fn with_warehouse<T, F>(warehouse: Arc<Warehouse>, call: F) -> Result<T, axum::response::Response>
where
    F: FnOnce(&Warehouse) -> LedgerResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(&warehouse)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(errors::ledger_error_to_response(e)),
        Err(e) => {
            tracing::error!(error = %e, "warehouse task failed");
            Err(errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "warehouse task failed",
            ))
        }
    }
}

/// Serialize a successful warehouse call with `status`, or map its error.
pub async fn respond<T, F>(status: StatusCode, warehouse: Arc<Warehouse>, call: F) -> axum::response::Response
where
    F: FnOnce(&Warehouse) -> LedgerResult<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    match with_warehouse(warehouse, call).await {
        Ok(body) => (status, Json(body)).into_response(),
        Err(resp) => resp,
    }
}
