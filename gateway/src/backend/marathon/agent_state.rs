//! Container names from the Mesos agent
//!
//! Marathon does not expose the Docker container a task runs in, but the
//! Mesos agent on the task's host does (`/state.json`). The lookup only
//! feeds log metadata: any failure yields `None` and never fails the
//! calling operation. Callers fetch each host's state once and resolve all
//! of its tasks against it.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::GatewayError;
use crate::models::StringMap;

/// Name of the Marathon framework in the agent state
const MARATHON_FRAMEWORK: &str = "marathon";

#[derive(Debug, Default, Deserialize)]
pub struct AgentState {
    #[serde(default)]
    pub frameworks: Vec<Framework>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Framework {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub executors: Vec<Executor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Executor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub tasks: Vec<AgentTask>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgentTask {
    #[serde(default)]
    pub slave_id: String,
}

impl AgentState {
    /// Docker container name of the executor running `task_id`
    pub fn container_name(&self, task_id: &str) -> Option<String> {
        let executor = self
            .frameworks
            .iter()
            .filter(|f| f.name == MARATHON_FRAMEWORK)
            .flat_map(|f| f.executors.iter())
            .find(|e| e.id == task_id)?;

        let slave_id = executor
            .tasks
            .first()
            .map(|t| t.slave_id.as_str())
            .unwrap_or_default();

        Some(format!("mesos-{}.{}", slave_id, executor.container))
    }
}

/// Unauthenticated client for the agents' introspection port
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    port: u16,
    log_search_pattern: Option<String>,
}

impl AgentClient {
    pub fn new(
        port: u16,
        timeout: Duration,
        log_search_pattern: Option<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConfigError(format!("cannot build agent client: {}", e)))?;

        Ok(Self {
            client,
            port,
            log_search_pattern,
        })
    }

    /// State of the agent on `host`, `None` when it cannot be asked
    pub async fn fetch(&self, host: &str) -> Option<AgentState> {
        let url = format!("http://{}:{}/state.json", host, self.port);
        debug!("GET {}", url);

        let result: Result<AgentState, GatewayError> = async {
            self.client
                .get(&url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| GatewayError::from_transport(&url, e))?
                .json()
                .await
                .map_err(|e| GatewayError::from_transport(&url, e))
        }
        .await;

        result
            .inspect_err(|e| debug!("Agent state lookup on {} failed: {}", host, e))
            .ok()
    }

    /// Log metadata for a task; empty when its agent gave no answer
    pub fn log_info(&self, state: Option<&AgentState>, host: &str, task_id: &str) -> StringMap {
        match state.and_then(|state| state.container_name(task_id)) {
            Some(container) => self.build_log_info(host, container),
            None => {
                debug!("No container known for task {} on {}", task_id, host);
                StringMap::new()
            }
        }
    }

    fn build_log_info(&self, host: &str, container: String) -> StringMap {
        let mut info = StringMap::new();
        if let Some(pattern) = &self.log_search_pattern {
            let short_host = host.split('.').next().unwrap_or(host);
            let url = pattern
                .replace("{container}", &container)
                .replace("{host}", short_host);
            info.insert("remoteURL".to_string(), url);
        }
        info.insert("containerName".to_string(), container);
        info
    }
}
