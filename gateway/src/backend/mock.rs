//! Canned backend for exercising the gateway without a scheduler

use async_trait::async_trait;
use tracing::debug;

use crate::backend::Backend;
use crate::errors::GatewayError;
use crate::models::{
    Artifact, ArtifactRequest, BaseRequest, Container, LabelFilter, Replica, ScaleRequest,
    StringMap,
};

/// Name returned by every mock operation
pub const MOCK_NAME: &str = "fake-cat";

/// Backend answering every call with the same fixed data.
///
/// Holds no state, so results never depend on earlier calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }

    fn artifact() -> Artifact {
        Artifact {
            name: MOCK_NAME.to_string(),
            message: "there should be no message".to_string(),
            status: "status".to_string(),
            labels: StringMap::new(),
            env: StringMap::new(),
            running_replicas: vec![Replica {
                status: "RUNNING".to_string(),
                endpoints: vec!["localhost:8888".to_string()],
                ports: Vec::new(),
                containers: vec![Container {
                    image_url: "registry.test/fake-cat".to_string(),
                    status: "OK".to_string(),
                    ..Default::default()
                }],
            }],
            requested_replicas: 1,
            cpus: 1.0,
            memory: 2048.0,
            endpoint: String::new(),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_names(&self, _filter: Option<&LabelFilter>) -> Result<Vec<String>, GatewayError> {
        Ok(vec![MOCK_NAME.to_string()])
    }

    async fn get_one(&self, req: &ArtifactRequest) -> Result<Artifact, GatewayError> {
        debug!("mock: get {}", req.name);
        Ok(Self::artifact())
    }

    async fn deploy(&self, req: &BaseRequest) -> Result<String, GatewayError> {
        debug!("mock: deploy {}", req.name);
        Ok(MOCK_NAME.to_string())
    }

    async fn scale(&self, req: &ScaleRequest) -> Result<String, GatewayError> {
        debug!("mock: scale {} to {}", req.name, req.replicas);
        Ok(MOCK_NAME.to_string())
    }

    async fn delete(&self, req: &ArtifactRequest) -> Result<String, GatewayError> {
        debug!("mock: delete {}", req.name);
        Ok(MOCK_NAME.to_string())
    }

    async fn update(&self, req: &BaseRequest) -> Result<String, GatewayError> {
        debug!("mock: update {}", req.name);
        Ok(MOCK_NAME.to_string())
    }
}
