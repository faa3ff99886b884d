//! Scheduler backends
//!
//! Every scheduler the gateway can drive implements [`Backend`]. One
//! implementation is chosen at startup by [`new_backend`] and stays in
//! place until the process exits.

pub mod marathon;
pub mod mock;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::BackendSettings;
use crate::errors::GatewayError;
use crate::models::{Artifact, ArtifactRequest, BaseRequest, LabelFilter, ScaleRequest};

pub use marathon::MarathonBackend;
pub use mock::MockBackend;

/// Capabilities every scheduler backend provides
#[async_trait]
pub trait Backend: Send + Sync {
    /// Names of deployed apps, narrowed to those whose labels match every
    /// entry of `filter`
    async fn list_names(&self, filter: Option<&LabelFilter>) -> Result<Vec<String>, GatewayError>;

    /// Live state of one deployment
    async fn get_one(&self, req: &ArtifactRequest) -> Result<Artifact, GatewayError>;

    /// Create a deployment, returning the identifier assigned by the backend
    async fn deploy(&self, req: &BaseRequest) -> Result<String, GatewayError>;

    /// Change the instance count, returning the backend operation id
    async fn scale(&self, req: &ScaleRequest) -> Result<String, GatewayError>;

    /// Remove a deployment, returning the backend operation id
    async fn delete(&self, req: &ArtifactRequest) -> Result<String, GatewayError>;

    /// Replace the spec of an existing deployment
    async fn update(&self, req: &BaseRequest) -> Result<String, GatewayError>;
}

/// Available backend implementations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Marathon,
    #[default]
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Marathon => "marathon",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "marathon" => Ok(BackendKind::Marathon),
            "mock" => Ok(BackendKind::Mock),
            other => Err(GatewayError::ConfigError(format!("unknown backend type: {}", other))),
        }
    }
}

/// Build the backend selected by the settings
pub fn new_backend(settings: &BackendSettings) -> Result<Arc<dyn Backend>, GatewayError> {
    info!("Selecting backend: {}", settings.kind);

    let backend: Arc<dyn Backend> = match settings.kind {
        BackendKind::Marathon => Arc::new(MarathonBackend::new(settings.marathon.clone())?),
        BackendKind::Mock => Arc::new(MockBackend::new()),
    };

    Ok(backend)
}
