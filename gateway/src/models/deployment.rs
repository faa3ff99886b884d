//! Deployment request models

use std::collections::BTreeMap;

use openapi_server::models::{DeploymentSpec, StringMap, Volume};

use crate::errors::GatewayError;
use crate::quantity::parse_memory;

/// Label key carrying the owning team
pub const TEAM_LABEL: &str = "team";

/// Label key carrying the owning user
pub const UID_LABEL: &str = "uid";

/// Label constraints applied when listing deployments
pub type LabelFilter = BTreeMap<String, String>;

/// Normalized deployment request shared by create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseRequest {
    pub name: String,
    pub ports: Vec<u16>,
    pub labels: StringMap,
    pub image_url: String,
    pub env: StringMap,
    pub replicas: u32,
    pub cpu_limit: f64,
    /// Memory limit in MB
    pub memory_limit: u64,
    pub force: bool,
    pub volumes: Vec<Volume>,
}

impl TryFrom<DeploymentSpec> for BaseRequest {
    type Error = GatewayError;

    fn try_from(spec: DeploymentSpec) -> Result<Self, Self::Error> {
        if spec.name.trim().is_empty() {
            return Err(GatewayError::Validation("deployment name is required".to_string()));
        }
        if !spec.cpu_limit.is_finite() || spec.cpu_limit < 0.0 {
            return Err(GatewayError::Validation(format!(
                "cpu limit must be a non-negative number, got {}",
                spec.cpu_limit
            )));
        }

        let memory_limit = parse_memory(&spec.memory_limit)?;

        Ok(Self {
            name: spec.name,
            ports: spec.ports,
            labels: spec.labels,
            image_url: spec.image_url,
            env: spec.env,
            replicas: spec.replicas,
            cpu_limit: spec.cpu_limit,
            memory_limit,
            force: spec.force,
            volumes: spec.volumes.unwrap_or_default(),
        })
    }
}

/// A create or update, both carrying the same normalized payload
#[derive(Debug, Clone, PartialEq)]
pub enum DeploymentRequest {
    Create(BaseRequest),
    Update(BaseRequest),
}

impl DeploymentRequest {
    pub fn base(&self) -> &BaseRequest {
        match self {
            DeploymentRequest::Create(base) | DeploymentRequest::Update(base) => base,
        }
    }
}

/// Operations addressed to a single named deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Deploy,
    List,
    Info,
    Delete,
}

/// Request about exactly one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub action: Action,
    pub name: String,
    pub labels: Option<StringMap>,
}

impl ArtifactRequest {
    pub fn info(name: impl Into<String>) -> Self {
        Self {
            action: Action::Info,
            name: name.into(),
            labels: None,
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            action: Action::Delete,
            name: name.into(),
            labels: None,
        }
    }
}

/// Change the number of instances of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleRequest {
    pub name: String,
    pub replicas: u32,
    pub force: bool,
}

/// Ownership of the caller, as established by the authenticating proxy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub team: Option<String>,
    pub uid: Option<String>,
}

impl Identity {
    /// Write the ownership labels into a label set
    pub fn apply_labels(&self, labels: &mut StringMap) {
        if let Some(team) = self.team.as_deref().filter(|t| !t.is_empty()) {
            labels.insert(TEAM_LABEL.to_string(), team.to_string());
        }
        if let Some(uid) = self.uid.as_deref().filter(|u| !u.is_empty()) {
            labels.insert(UID_LABEL.to_string(), uid.to_string());
        }
    }

    /// Filter restricting a listing to this caller's deployments
    pub fn to_filter(&self) -> LabelFilter {
        let mut filter = LabelFilter::new();
        self.apply_labels(&mut filter);
        filter
    }
}
