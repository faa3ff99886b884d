//! Gateway facade
//!
//! Owns the backend chosen at startup and routes every operation to it.
//! Handlers receive the facade through server state; there is no global
//! backend handle.

use std::sync::Arc;

use tracing::instrument;

use crate::backend::{Backend, BackendKind};
use crate::errors::GatewayError;
use crate::models::{
    Artifact, ArtifactRequest, BaseRequest, DeploymentRequest, Identity, LabelFilter,
    ScaleRequest,
};

pub struct Gateway {
    kind: BackendKind,
    backend: Arc<dyn Backend>,
}

impl Gateway {
    pub fn new(kind: BackendKind, backend: Arc<dyn Backend>) -> Self {
        Self { kind, backend }
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn list_names(&self, filter: Option<&LabelFilter>) -> Result<Vec<String>, GatewayError> {
        self.backend.list_names(filter).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_one(&self, name: &str) -> Result<Artifact, GatewayError> {
        self.backend.get_one(&ArtifactRequest::info(name)).await
    }

    /// Deploy a new app, tagging it with the caller's ownership labels
    #[instrument(skip(self, req), fields(name = %req.name), level = "debug")]
    pub async fn create(
        &self,
        mut req: BaseRequest,
        identity: Option<&Identity>,
    ) -> Result<String, GatewayError> {
        if let Some(identity) = identity {
            identity.apply_labels(&mut req.labels);
        }
        self.backend.deploy(&req).await
    }

    /// Replace an app, re-tagging it with the caller's ownership labels
    #[instrument(skip(self, req), fields(name = %req.name), level = "debug")]
    pub async fn update(
        &self,
        mut req: BaseRequest,
        identity: Option<&Identity>,
    ) -> Result<String, GatewayError> {
        if let Some(identity) = identity {
            identity.apply_labels(&mut req.labels);
        }
        self.backend.update(&req).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn scale(&self, name: &str, replicas: u32, force: bool) -> Result<String, GatewayError> {
        let req = ScaleRequest {
            name: name.to_string(),
            replicas,
            force,
        };
        self.backend.scale(&req).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn delete(&self, name: &str) -> Result<String, GatewayError> {
        self.backend.delete(&ArtifactRequest::delete(name)).await
    }

    /// Dispatch a tagged create or update
    pub async fn apply(
        &self,
        req: DeploymentRequest,
        identity: Option<&Identity>,
    ) -> Result<String, GatewayError> {
        match req {
            DeploymentRequest::Create(base) => self.create(base, identity).await,
            DeploymentRequest::Update(base) => self.update(base, identity).await,
        }
    }
}
