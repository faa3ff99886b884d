//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::errors::GatewayError;
use crate::logs::LogLevel;

/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/gantry/settings.json";

/// Gateway settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerSettings,

    /// Scheduler backend selection
    #[serde(default)]
    pub backend: BackendSettings,
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            GatewayError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(contents).map_err(|e| GatewayError::ConfigError(e.to_string()))
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Backend selection, fixed for the lifetime of the process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default)]
    pub kind: BackendKind,

    #[serde(default)]
    pub marathon: MarathonSettings,
}

/// Marathon scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarathonSettings {
    /// Base URL of the Marathon API
    #[serde(default = "default_marathon_endpoint")]
    pub endpoint: String,

    /// HTTP basic credentials, when Marathon requires them
    #[serde(default)]
    pub auth: Option<BasicAuthSettings>,

    /// URI fetched into every sandbox so private registries can be pulled from
    #[serde(default = "default_docker_cfg_uri")]
    pub docker_cfg_uri: String,

    /// Public URL of a deployment, `{name}` is replaced by the app id
    #[serde(default = "default_endpoint_pattern")]
    pub endpoint_pattern: String,

    #[serde(default)]
    pub log_shipping: LogShippingSettings,

    /// Hand the default health checks to Marathon
    #[serde(default)]
    pub enforce_health_checks: bool,

    /// Port of the Mesos agent introspection API
    #[serde(default = "default_agent_port")]
    pub agent_port: u16,

    /// Upper bound for a single agent introspection call
    #[serde(default = "default_agent_timeout_secs")]
    pub agent_timeout_secs: u64,

    /// Log search URL, `{container}` and `{host}` are substituted
    #[serde(default)]
    pub log_search_pattern: Option<String>,
}

fn default_marathon_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_docker_cfg_uri() -> String {
    "file:///root/.dockercfg".to_string()
}

fn default_endpoint_pattern() -> String {
    "http://{name}.localhost".to_string()
}

fn default_agent_port() -> u16 {
    5051
}

fn default_agent_timeout_secs() -> u64 {
    2
}

impl Default for MarathonSettings {
    fn default() -> Self {
        Self {
            endpoint: default_marathon_endpoint(),
            auth: None,
            docker_cfg_uri: default_docker_cfg_uri(),
            endpoint_pattern: default_endpoint_pattern(),
            log_shipping: LogShippingSettings::default(),
            enforce_health_checks: false,
            agent_port: default_agent_port(),
            agent_timeout_secs: default_agent_timeout_secs(),
            log_search_pattern: None,
        }
    }
}

/// HTTP basic credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct BasicAuthSettings {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthSettings")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Container log forwarding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogShippingSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Address of the fluentd agent on each host
    #[serde(default = "default_log_shipping_address")]
    pub address: String,
}

fn default_log_shipping_address() -> String {
    "localhost:24224".to_string()
}

impl Default for LogShippingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_log_shipping_address(),
        }
    }
}
