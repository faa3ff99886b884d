//! Marathon backend
//!
//! Drives a Marathon scheduler over its v2 REST API. Requests are
//! translated into full app definitions (`translate`), and app state with
//! embedded tasks is folded back into artifacts (`normalize`).

pub mod agent_state;
pub mod client;
pub mod normalize;
pub mod translate;
pub mod types;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::backend::Backend;
use crate::config::MarathonSettings;
use crate::errors::GatewayError;
use crate::models::{
    Artifact, ArtifactRequest, BaseRequest, LabelFilter, ScaleRequest, StringMap,
};

use agent_state::{AgentClient, AgentState};
use client::MarathonClient;
use types::{App, AppResponse, AppsResponse, DeploymentResult, ScaleBody};

const APPS_PATH: &str = "/v2/apps";

/// Backend talking to a Marathon scheduler
#[derive(Debug, Clone)]
pub struct MarathonBackend {
    client: MarathonClient,
    agent: AgentClient,
    settings: MarathonSettings,
}

impl MarathonBackend {
    pub fn new(settings: MarathonSettings) -> Result<Self, GatewayError> {
        let client = MarathonClient::new(&settings.endpoint, settings.auth.clone())?;
        let agent = AgentClient::new(
            settings.agent_port,
            Duration::from_secs(settings.agent_timeout_secs),
            settings.log_search_pattern.clone(),
        )?;

        info!("Using Marathon at {}", client.base_url());

        Ok(Self {
            client,
            agent,
            settings,
        })
    }

    pub fn settings(&self) -> &MarathonSettings {
        &self.settings
    }

    /// Log metadata for every task of an app, one entry per task.
    ///
    /// Each distinct host is asked once, all hosts concurrently.
    async fn task_log_infos(&self, app: &App) -> Vec<StringMap> {
        let tasks = app.tasks.as_deref().unwrap_or_default();
        let hosts: BTreeSet<&str> = tasks.iter().map(|task| task.host.as_str()).collect();

        let states = join_all(hosts.iter().map(|host| self.agent.fetch(host))).await;
        let states: BTreeMap<&str, Option<AgentState>> = hosts.into_iter().zip(states).collect();

        tasks
            .iter()
            .map(|task| {
                let state = states.get(task.host.as_str()).and_then(Option::as_ref);
                self.agent.log_info(state, &task.host, &task.id)
            })
            .collect()
    }

    async fn create_app(&self, app: &App, force: bool, context: &str) -> Result<String, GatewayError> {
        let created: App = self
            .client
            .post(APPS_PATH, &force_query(force), app, context)
            .await?;
        if created.id.is_empty() {
            Ok(app.id.clone())
        } else {
            Ok(created.id)
        }
    }
}

/// Path of a single app; Marathon ids may or may not carry a leading slash
fn app_path(name: &str) -> String {
    format!("{}/{}", APPS_PATH, name.trim_start_matches('/'))
}

fn force_query(force: bool) -> Vec<(&'static str, String)> {
    vec![("force", force.to_string())]
}

#[async_trait]
impl Backend for MarathonBackend {
    async fn list_names(&self, filter: Option<&LabelFilter>) -> Result<Vec<String>, GatewayError> {
        let query: Vec<(&str, String)> = translate::label_selector(filter)
            .map(|selector| vec![("label", selector)])
            .unwrap_or_default();

        let apps: AppsResponse = self
            .client
            .get(APPS_PATH, &query, "list apps")
            .await
            .inspect_err(|e| error!("Failed to list apps: {}", e))?;

        debug!("Marathon returned {} apps", apps.apps.len());
        Ok(apps.apps.into_iter().map(|app| app.id).collect())
    }

    async fn get_one(&self, req: &ArtifactRequest) -> Result<Artifact, GatewayError> {
        let context = format!("get {}", req.name);
        let query = vec![
            ("embed", "app.tasks".to_string()),
            ("embed", "app.lastTaskFailure".to_string()),
        ];

        let response: AppResponse = self
            .client
            .get(&app_path(&req.name), &query, &context)
            .await
            .inspect_err(|e| error!("Failed to {}: {}", context, e))?;

        let log_infos = self.task_log_infos(&response.app).await;
        Ok(normalize::to_artifact(
            &response.app,
            &self.settings.endpoint_pattern,
            log_infos,
        ))
    }

    async fn deploy(&self, req: &BaseRequest) -> Result<String, GatewayError> {
        let context = format!("deploy {}", req.name);

        if req.force {
            let delete_context = format!("remove previous {}", req.name);
            match self
                .client
                .delete::<DeploymentResult>(&app_path(&req.name), &delete_context)
                .await
            {
                Ok(result) => debug!(
                    "Removed previous {} (deployment {})",
                    req.name, result.deployment_id
                ),
                Err(e) => warn!("Could not remove previous {}: {}", req.name, e),
            }
        }

        // The removal runs as a Marathon deployment of its own; forcing the
        // create keeps it from being rejected as locked meanwhile
        let app = translate::build_app(req, &self.settings);
        let id = self
            .create_app(&app, req.force, &context)
            .await
            .inspect_err(|e| error!("Failed to {}: {}", context, e))?;

        info!("Deployed {} as {}", req.name, id);
        Ok(id)
    }

    async fn scale(&self, req: &ScaleRequest) -> Result<String, GatewayError> {
        let context = format!("scale {}", req.name);
        let body = ScaleBody {
            instances: req.replicas,
        };

        let result: DeploymentResult = self
            .client
            .put(&app_path(&req.name), &force_query(req.force), &body, &context)
            .await
            .inspect_err(|e| error!("Failed to {}: {}", context, e))?;

        info!(
            "Scaling {} to {} replicas (deployment {})",
            req.name, req.replicas, result.deployment_id
        );
        Ok(result.deployment_id)
    }

    async fn delete(&self, req: &ArtifactRequest) -> Result<String, GatewayError> {
        let context = format!("delete {}", req.name);

        let result: DeploymentResult = self
            .client
            .delete(&app_path(&req.name), &context)
            .await
            .inspect_err(|e| error!("Failed to {}: {}", context, e))?;

        info!("Deleting {} (deployment {})", req.name, result.deployment_id);
        Ok(result.deployment_id)
    }

    async fn update(&self, req: &BaseRequest) -> Result<String, GatewayError> {
        let context = format!("update {}", req.name);
        let app = translate::build_app(req, &self.settings);

        let result: DeploymentResult = self
            .client
            .put(&app_path(&req.name), &force_query(req.force), &app, &context)
            .await
            .inspect_err(|e| error!("Failed to {}: {}", context, e))?;

        info!("Updating {} (deployment {})", req.name, result.deployment_id);
        Ok(result.deployment_id)
    }
}
