//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: picks the ledger store and builds the warehouse
//! - `routes/`: HTTP routes + handlers (one file per ledger or view)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use pairledger_infra::Warehouse;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around an existing warehouse.
pub fn build_router(warehouse: Arc<Warehouse>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::actor_middleware))
            .layer(Extension(warehouse)),
    )
}

/// Build the router from configuration (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let warehouse = Arc::new(services::build_warehouse(config)?);
    Ok(build_router(warehouse))
}

/// Bind the HTTP listener.
pub async fn bind(addr: SocketAddr) -> anyhow::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))
}
