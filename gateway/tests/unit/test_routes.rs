//! HTTP route tests

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use gantry::backend::{BackendKind, MarathonBackend, MockBackend};
use gantry::config::MarathonSettings;
use gantry::gateway::Gateway;
use gantry::models::Artifact;
use gantry::server::{build_router, ServerState};
use openapi_server::models::{
    ErrorResponse, ListDeploymentsResponse, NameResponse, RootResponse,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_router() -> Router {
    let gateway = Gateway::new(BackendKind::Mock, Arc::new(MockBackend::new()));
    build_router(Arc::new(ServerState::new(Arc::new(gateway))))
}

fn marathon_router(server: &MockServer) -> Router {
    let settings = MarathonSettings {
        endpoint: server.uri(),
        ..Default::default()
    };
    let backend = MarathonBackend::new(settings).unwrap();
    let gateway = Gateway::new(BackendKind::Marathon, Arc::new(backend));
    build_router(Arc::new(ServerState::new(Arc::new(gateway))))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-team", "shop")
        .header("x-uid", "jdoe")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn cat_spec() -> serde_json::Value {
    json!({
        "name": "cat",
        "imageURL": "registry.test/cat:1",
        "ports": [8080],
        "replicas": 2,
        "cpuLimit": 0.5,
        "memoryLimit": "1GB"
    })
}

#[tokio::test]
async fn test_root_reports_backend() {
    let (status, body) = send(&mock_router(), get("/")).await;
    assert_eq!(status, StatusCode::OK);

    let root: RootResponse = decode(&body);
    assert_eq!(root.service, "gantry");
    assert_eq!(root.backend, "mock");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&mock_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let health: serde_json::Value = decode(&body);
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_list_deployments() {
    let (status, body) = send(&mock_router(), get("/deployments?all=true")).await;
    assert_eq!(status, StatusCode::OK);

    let list: ListDeploymentsResponse = decode(&body);
    assert_eq!(list.deployments, vec!["fake-cat".to_string()]);
}

#[tokio::test]
async fn test_create_then_info() {
    let app = mock_router();

    let (status, body) = send(&app, with_json("POST", "/deployments", cat_spec())).await;
    assert_eq!(status, StatusCode::OK);
    let created: NameResponse = decode(&body);
    assert_eq!(created.name, "fake-cat");

    let (status, body) = send(&app, get("/deployments/cat")).await;
    assert_eq!(status, StatusCode::OK);
    let artifact: Artifact = decode(&body);
    assert_eq!(artifact.name, "fake-cat");
    assert_eq!(artifact.requested_replicas, 1);

    let raw: serde_json::Value = decode(&body);
    assert!(raw.get("runningReplicas").is_some());
    assert!(raw["runningReplicas"][0]["containers"][0].get("imageURL").is_some());
}

#[tokio::test]
async fn test_update_delete_and_scale() {
    let app = mock_router();

    let (status, body) = send(&app, with_json("PUT", "/deployments/cat", cat_spec())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decode::<serde_json::Value>(&body), json!({}));

    let request = Request::builder()
        .method("DELETE")
        .uri("/deployments/cat")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("PATCH")
        .uri("/deployments/cat/replicas/4?force=true")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_memory_is_bad_request() {
    let mut spec = cat_spec();
    spec["memoryLimit"] = json!("lots");

    let (status, body) = send(&mock_router(), with_json("POST", "/deployments", spec)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: ErrorResponse = decode(&body);
    assert!(error.error.contains("lots"));
}

#[tokio::test]
async fn test_update_name_mismatch_is_bad_request() {
    let (status, _) = send(&mock_router(), with_json("PUT", "/deployments/dog", cat_spec())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_replica_count_is_bad_request() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/deployments/cat/replicas/-1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&mock_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_caller_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps"))
        .and(query_param("label", "team==shop,uid==jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apps": [{"id": "/cat"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .uri("/deployments")
        .header("x-team", "shop")
        .header("x-uid", "jdoe")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&marathon_router(&server), request).await;
    assert_eq!(status, StatusCode::OK);

    let list: ListDeploymentsResponse = decode(&body);
    assert_eq!(list.deployments, vec!["/cat".to_string()]);
}

#[tokio::test]
async fn test_create_writes_ownership_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/apps"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "/cat"})))
        .mount(&server)
        .await;

    let (status, body) = send(
        &marathon_router(&server),
        with_json("POST", "/deployments", cat_spec()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decode::<NameResponse>(&body).name, "/cat");

    let requests = server.received_requests().await.unwrap();
    let app: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(app["labels"]["team"], "shop");
    assert_eq!(app["labels"]["uid"], "jdoe");
    assert_eq!(app["mem"], 1000.0);
}

#[tokio::test]
async fn test_backend_errors_map_to_status_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/apps/dog"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "App '/dog' does not exist"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/apps"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "already exists"})))
        .mount(&server)
        .await;

    let app = marathon_router(&server);

    let (status, body) = send(&app, get("/deployments/dog")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = decode(&body);
    assert!(error.error.contains("does not exist"));

    let (status, _) = send(&app, with_json("POST", "/deployments", cat_spec())).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_keeps_ownership_labels() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v2/apps/cat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deploymentId": "d-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _) = send(
        &marathon_router(&server),
        with_json("PUT", "/deployments/cat", cat_spec()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = server.received_requests().await.unwrap();
    let app: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(app["labels"]["team"], "shop");
    assert_eq!(app["labels"]["uid"], "jdoe");
}

#[tokio::test]
async fn test_undecodable_body_is_bad_request() {
    let app = mock_router();

    let request = Request::builder()
        .method("POST")
        .uri("/deployments")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = decode(&body);
    assert!(error.error.starts_with("Validation error"));

    let (status, body) = send(
        &app,
        with_json("PUT", "/deployments/cat", json!({"imageURL": "registry.test/cat:1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = decode(&body);
    assert!(error.error.contains("name"));
}
