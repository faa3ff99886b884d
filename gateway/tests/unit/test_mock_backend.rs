//! Mock backend contract tests

use std::sync::Arc;

use gantry::backend::mock::MOCK_NAME;
use gantry::backend::{new_backend, Backend, BackendKind, MockBackend};
use gantry::config::BackendSettings;
use gantry::gateway::Gateway;
use gantry::models::{ArtifactRequest, BaseRequest, DeploymentSpec, Identity, ScaleRequest};

fn cat_request() -> BaseRequest {
    BaseRequest::try_from(DeploymentSpec {
        name: "cat".to_string(),
        image_url: "registry.test/cat:1".to_string(),
        memory_limit: "512MB".to_string(),
        replicas: 2,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_deploy_then_get_one() {
    let backend = MockBackend::new();

    backend.deploy(&cat_request()).await.unwrap();
    let artifact = backend.get_one(&ArtifactRequest::info("cat")).await.unwrap();

    assert_eq!(artifact.name, "fake-cat");
    assert_eq!(artifact.requested_replicas, 1);
}

#[tokio::test]
async fn test_answers_are_deterministic() {
    let backend = MockBackend::new();

    let first = backend.get_one(&ArtifactRequest::info("cat")).await.unwrap();
    backend
        .scale(&ScaleRequest {
            name: "cat".to_string(),
            replicas: 5,
            force: true,
        })
        .await
        .unwrap();
    backend.delete(&ArtifactRequest::delete("cat")).await.unwrap();
    let second = backend.get_one(&ArtifactRequest::info("dog")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.update(&cat_request()).await.unwrap(), MOCK_NAME);
}

#[tokio::test]
async fn test_gateway_over_factory_backend() {
    let settings = BackendSettings::default();
    let backend = new_backend(&settings).unwrap();
    let gateway = Gateway::new(settings.kind, backend);

    let identity = Identity {
        team: Some("shop".to_string()),
        uid: Some("jdoe".to_string()),
    };
    let name = gateway.create(cat_request(), Some(&identity)).await.unwrap();
    assert_eq!(name, MOCK_NAME);
    assert_eq!(gateway.kind(), BackendKind::Mock);

    let names = gateway.list_names(Some(&identity.to_filter())).await.unwrap();
    assert_eq!(names, vec![MOCK_NAME.to_string()]);
}

#[tokio::test]
async fn test_shared_backend_handle() {
    let backend: Arc<dyn Backend> = Arc::new(MockBackend::new());
    let gateway = Arc::new(Gateway::new(BackendKind::Mock, backend));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let gateway = gateway.clone();
        handles.push(tokio::spawn(async move { gateway.get_one("cat").await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().name, MOCK_NAME);
    }
}
