//! Gateway requests to Marathon app definitions

use crate::backend::marathon::types::{
    App, AppContainer, Command, Docker, HealthCheck, MarathonVolume, Parameter, PortMapping,
};
use crate::config::MarathonSettings;
use crate::models::deployment::{TEAM_LABEL, UID_LABEL};
use crate::models::{BaseRequest, LabelFilter};

/// Path of the HTTP health endpoint every app is expected to serve
pub const HEALTH_PATH: &str = "/health";

/// Translate a normalized request into a full Marathon app definition
pub fn build_app(req: &BaseRequest, settings: &MarathonSettings) -> App {
    let port_mappings = req
        .ports
        .iter()
        .map(|port| PortMapping {
            container_port: *port,
            host_port: 0,
            protocol: "tcp".to_string(),
        })
        .collect();

    let volumes = req
        .volumes
        .iter()
        .map(|volume| MarathonVolume {
            container_path: volume.container_path.clone(),
            host_path: volume.host_path.clone(),
            mode: volume.mode.to_uppercase(),
        })
        .collect();

    let parameters = if settings.log_shipping.enabled {
        log_parameters(&settings.log_shipping.address)
    } else {
        Vec::new()
    };

    // Always built; only handed to Marathon when enforcement is switched on
    let health_checks = default_health_checks();

    App {
        id: req.name.clone(),
        cpus: req.cpu_limit,
        mem: req.memory_limit as f64,
        disk: 0.0,
        instances: req.replicas,
        env: req
            .env
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
        labels: req.labels.clone(),
        uris: vec![settings.docker_cfg_uri.clone()],
        container: Some(AppContainer {
            kind: "DOCKER".to_string(),
            docker: Some(Docker {
                image: req.image_url.clone(),
                network: Some("BRIDGE".to_string()),
                port_mappings,
                force_pull_image: true,
                parameters,
            }),
            volumes,
        }),
        health_checks: if settings.enforce_health_checks {
            health_checks
        } else {
            Vec::new()
        },
        ..Default::default()
    }
}

/// HTTP check on `/health` plus an equivalent curl command check
pub fn default_health_checks() -> Vec<HealthCheck> {
    vec![
        HealthCheck {
            protocol: "HTTP".to_string(),
            path: Some(HEALTH_PATH.to_string()),
            command: None,
            grace_period_seconds: Some(3),
            interval_seconds: Some(10),
            max_consecutive_failures: 10,
        },
        HealthCheck {
            protocol: "COMMAND".to_string(),
            path: None,
            command: Some(Command {
                value: format!("curl -f -X GET http://$HOST:$PORT0{}", HEALTH_PATH),
            }),
            grace_period_seconds: None,
            interval_seconds: None,
            max_consecutive_failures: 10,
        },
    ]
}

/// Docker parameters routing container output to the fluentd agent
pub fn log_parameters(address: &str) -> Vec<Parameter> {
    vec![
        Parameter {
            key: "log-driver".to_string(),
            value: "fluentd".to_string(),
        },
        Parameter {
            key: "log-opt".to_string(),
            value: format!("fluentd-address={}", address),
        },
        Parameter {
            key: "log-opt".to_string(),
            value: "tag={{.ImageName}}/{{.Name}}".to_string(),
        },
    ]
}

/// Marathon label selector for an ownership filter.
///
/// Only the `team` and `uid` keys are honored; when both are set they are
/// combined into one conjunctive selector. `None` means unfiltered.
pub fn label_selector(filter: Option<&LabelFilter>) -> Option<String> {
    let filter = filter?;
    let terms: Vec<String> = [TEAM_LABEL, UID_LABEL]
        .iter()
        .filter_map(|key| {
            filter
                .get(*key)
                .filter(|value| !value.is_empty())
                .map(|value| format!("{}=={}", key, value))
        })
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(","))
    }
}
