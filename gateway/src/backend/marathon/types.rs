//! Marathon REST API models
//!
//! Only the fields the gateway reads or writes are modelled; everything
//! else in Marathon's replies is ignored on decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::StringMap;

/// Marathon application definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub id: String,

    #[serde(default)]
    pub cpus: f64,

    #[serde(default)]
    pub mem: f64,

    #[serde(default)]
    pub disk: f64,

    #[serde(default)]
    pub instances: u32,

    /// Values may be secret references on the Marathon side, hence untyped
    #[serde(default)]
    pub env: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub labels: StringMap,

    #[serde(default)]
    pub uris: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<AppContainer>,

    #[serde(default)]
    pub health_checks: Vec<HealthCheck>,

    // Read-only, present when embedded
    #[serde(default, skip_serializing)]
    pub tasks: Option<Vec<Task>>,

    #[serde(default, skip_serializing)]
    pub tasks_running: u32,

    #[serde(default, skip_serializing)]
    pub last_task_failure: Option<TaskFailure>,
}

/// Container section of an app
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppContainer {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<Docker>,

    #[serde(default)]
    pub volumes: Vec<MarathonVolume>,
}

/// Docker specific container settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Docker {
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(default)]
    pub port_mappings: Vec<PortMapping>,

    #[serde(default)]
    pub force_pull_image: bool,

    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    #[serde(default)]
    pub host_port: u16,
    #[serde(default)]
    pub protocol: String,
}

/// Extra `docker run` argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarathonVolume {
    pub container_path: String,
    #[serde(default)]
    pub host_path: String,
    /// "RO" or "RW"
    #[serde(default)]
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub protocol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,

    pub max_consecutive_failures: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub value: String,
}

/// A running (or staging) instance of an app
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub ports: Vec<u16>,

    #[serde(default)]
    pub health_check_results: Vec<HealthCheckResult>,

    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub alive: bool,

    #[serde(default)]
    pub task_id: Option<String>,
}

/// Most recent task failure of an app
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFailure {
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub timestamp: String,
}

/// `GET /v2/apps/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct AppResponse {
    pub app: App,
}

/// `GET /v2/apps`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppsResponse {
    #[serde(default)]
    pub apps: Vec<App>,
}

/// Reply of operations that start a Marathon deployment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    pub deployment_id: String,

    #[serde(default)]
    pub version: Option<String>,
}

/// Partial app used to change the instance count
#[derive(Debug, Clone, Serialize)]
pub struct ScaleBody {
    pub instances: u32,
}

/// Error body Marathon sends with 4xx/5xx replies
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
