//! Client-side models

pub use openapi_server::models::{
    Artifact, DeploymentSpec, ErrorResponse, ListDeploymentsResponse, NameResponse,
};

/// A named gateway endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub name: String,
    pub base_url: String,
}

impl Cluster {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

/// Result of running one operation against one cluster
#[derive(Debug)]
pub struct ClusterOutcome<T, E> {
    pub cluster: String,
    pub result: Result<T, E>,
}
