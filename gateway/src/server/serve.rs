//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::GatewayError;
use crate::server::handlers::{
    create_handler, delete_handler, health_handler, info_handler, list_handler, root_handler,
    scale_handler, update_handler,
};
use crate::server::state::ServerState;

/// Routes of the gateway API
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Build info and health
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Deployments
        .route("/deployments", get(list_handler).post(create_handler))
        .route(
            "/deployments/{name}",
            get(info_handler).put(update_handler).delete(delete_handler),
        )
        .route("/deployments/{name}/replicas/{num}", patch(scale_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), GatewayError>>, GatewayError> {
    let app = build_router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| GatewayError::ServerError(format!("cannot bind {}: {}", addr, e)))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| GatewayError::ServerError(e.to_string()))
    });

    Ok(handle)
}
