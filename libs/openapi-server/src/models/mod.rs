//! Gateway API models
//!
//! Request and response bodies of the `/deployments` resource. The same
//! structures double as the value types handed to and returned from the
//! scheduler backends, so they carry no behavior.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Arbitrary key/value bag used for labels, environment and log metadata
pub type StringMap = BTreeMap<String, String>;

/// Deployment request as submitted by a caller (create and update)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Unique deployment name, e.g. "shop"
    pub name: String,

    /// Container image reference
    #[serde(default, rename = "imageURL")]
    pub image_url: String,

    /// Container ports in declaration order
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Labels, e.g. {"env": "live"}
    #[serde(default)]
    pub labels: StringMap,

    /// Environment variables
    #[serde(default)]
    pub env: StringMap,

    /// Number of instances to run
    #[serde(default)]
    pub replicas: u32,

    /// Relative CPU share
    #[serde(default)]
    pub cpu_limit: f64,

    /// Memory limit, "512", "512MB" or "2GB"
    #[serde(default)]
    pub memory_limit: String,

    /// Bypass existing-state checks on the backend
    #[serde(default)]
    pub force: bool,

    /// Host volumes to mount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,
}

/// A volume mounted into a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub name: String,
    pub container_path: String,
    pub host_path: String,
    /// "ro" or "rw"
    #[serde(default)]
    pub mode: String,
}

/// Port exposed by a replica or container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortType {
    pub port: u16,
    pub protocol: String,
}

/// A container belonging to a replica
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(default)]
    pub ports: Vec<PortType>,
    /// "OK" or "NOT ALIVE"
    pub status: String,
    #[serde(default, rename = "loginfo")]
    pub log_info: StringMap,
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

/// One running instance of a deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replica {
    pub status: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub ports: Vec<PortType>,
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// Snapshot of a deployment's live state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,
    #[serde(default)]
    pub message: String,
    pub status: String,
    #[serde(default)]
    pub labels: StringMap,
    #[serde(default)]
    pub env: StringMap,
    #[serde(default)]
    pub running_replicas: Vec<Replica>,
    pub requested_replicas: u32,
    pub cpus: f64,
    pub memory: f64,
    #[serde(default)]
    pub endpoint: String,
}

/// Deployment list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDeploymentsResponse {
    pub deployments: Vec<String>,
}

/// Create response carrying the backend-assigned identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameResponse {
    pub name: String,
}

/// Error body returned with every non-2xx status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build information served on `/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub service: String,
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
    pub backend: String,
}

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
