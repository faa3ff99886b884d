//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::errors::GatewayError;
use crate::models::{Artifact, BaseRequest, DeploymentRequest, DeploymentSpec, Identity};
use crate::server::state::ServerState;
use crate::utils::version_info;
use openapi_server::models::{
    HealthResponse, ListDeploymentsResponse, NameResponse, RootResponse,
};

/// Header carrying the caller's team, set by the authenticating proxy
pub const TEAM_HEADER: &str = "x-team";

/// Header carrying the caller's user id, set by the authenticating proxy
pub const UID_HEADER: &str = "x-uid";

const SERVICE_NAME: &str = "gantry";

/// Decode a JSON body, reporting rejections in the gateway's error format
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| GatewayError::Validation(rejection.body_text()))
}

/// Identity forwarded by the proxy in front of the gateway
pub fn identity_from_headers(headers: &HeaderMap) -> Identity {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Identity {
        team: read(TEAM_HEADER),
        uid: read(UID_HEADER),
    }
}

/// Build info handler
pub async fn root_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let version = version_info();
    Json(RootResponse {
        service: SERVICE_NAME.to_string(),
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
        backend: state.gateway.kind().to_string(),
    })
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: version.version,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub all: bool,
}

/// List deployments, restricted to the caller's unless `all` is set
pub async fn list_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Json<ListDeploymentsResponse>, GatewayError> {
    let filter = if params.all {
        None
    } else {
        Some(identity_from_headers(&headers).to_filter())
    };

    let deployments = state.gateway.list_names(filter.as_ref()).await?;
    Ok(Json(ListDeploymentsResponse { deployments }))
}

/// Live state of one deployment
pub async fn info_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<Json<Artifact>, GatewayError> {
    let artifact = state.gateway.get_one(&name).await?;
    Ok(Json(artifact))
}

/// Create a deployment owned by the caller
pub async fn create_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    payload: Result<Json<DeploymentSpec>, JsonRejection>,
) -> Result<Json<NameResponse>, GatewayError> {
    let spec = json_body(payload)?;
    let req = DeploymentRequest::Create(BaseRequest::try_from(spec)?);
    let identity = identity_from_headers(&headers);

    let name = state.gateway.apply(req, Some(&identity)).await?;
    info!("Created deployment {}", name);
    Ok(Json(NameResponse { name }))
}

/// Replace a deployment, keeping it owned by the caller
pub async fn update_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<DeploymentSpec>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let mut spec = json_body(payload)?;
    if spec.name.is_empty() {
        spec.name = name.clone();
    } else if spec.name != name {
        return Err(GatewayError::Validation(format!(
            "deployment name {} does not match path {}",
            spec.name, name
        )));
    }

    let req = DeploymentRequest::Update(BaseRequest::try_from(spec)?);
    let identity = identity_from_headers(&headers);
    state.gateway.apply(req, Some(&identity)).await?;
    Ok(Json(json!({})))
}

/// Remove a deployment
pub async fn delete_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    state.gateway.delete(&name).await?;
    Ok(Json(json!({})))
}

#[derive(Debug, Default, Deserialize)]
pub struct ScaleParams {
    #[serde(default)]
    pub force: bool,
}

/// Change the replica count of a deployment
pub async fn scale_handler(
    State(state): State<Arc<ServerState>>,
    Path((name, num)): Path<(String, String)>,
    Query(params): Query<ScaleParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let replicas: u32 = num
        .parse()
        .map_err(|_| GatewayError::Validation(format!("invalid replica count: {}", num)))?;

    state.gateway.scale(&name, replicas, params.force).await?;
    Ok(Json(json!({})))
}
