//! Marathon app state to gateway artifacts

use crate::backend::marathon::types::{App, Task};
use crate::models::{Artifact, Container, PortType, Replica, StringMap, Volume};
use crate::utils::concat_ports;

pub const STATUS_RUNNING: &str = "RUNNING";
pub const STATUS_DEPLOYING: &str = "DEPLOYING/WAITING";
pub const REPLICA_OK: &str = "OK";
pub const REPLICA_NOT_ALIVE: &str = "NOT ALIVE";

/// Whether Marathon reports every requested instance as running
pub fn all_tasks_running(app: &App) -> bool {
    if app.instances == 0 {
        return true;
    }
    app.tasks.is_some() && app.tasks_running == app.instances
}

/// A replica is healthy only if none of its health check results is failing
pub fn replica_status(task: &Task) -> &'static str {
    if task.health_check_results.iter().all(|hc| hc.alive) {
        REPLICA_OK
    } else {
        REPLICA_NOT_ALIVE
    }
}

/// Aggregate status and message of an app
pub fn app_status(app: &App) -> (String, String) {
    if all_tasks_running(app) {
        return (STATUS_RUNNING.to_string(), String::new());
    }

    // Marathon keeps retrying instead of failing, so a pending app may
    // just be waiting for resources.
    let message = app
        .last_task_failure
        .as_ref()
        .map(|failure| format!("{}, {} AT {}", failure.state, failure.message, failure.timestamp))
        .unwrap_or_default();

    (STATUS_DEPLOYING.to_string(), message)
}

/// Public endpoint of an app, `{name}` in `pattern` is the id without its leading slash
pub fn endpoint_for(app_id: &str, pattern: &str) -> String {
    let name = app_id.strip_prefix('/').unwrap_or(app_id);
    pattern.replace("{name}", name)
}

/// Fold an app and its tasks into an artifact.
///
/// `log_infos` holds the log metadata of each task, in task order; missing
/// entries are treated as empty.
pub fn to_artifact(app: &App, endpoint_pattern: &str, log_infos: Vec<StringMap>) -> Artifact {
    let (status, message) = app_status(app);

    let docker = app.container.as_ref().and_then(|c| c.docker.as_ref());
    let image_url = docker.map(|d| d.image.clone()).unwrap_or_default();
    let container_ports: Vec<PortType> = docker
        .map(|d| {
            d.port_mappings
                .iter()
                .map(|pm| PortType {
                    port: pm.container_port,
                    protocol: pm.protocol.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    let volumes: Vec<Volume> = app
        .container
        .as_ref()
        .map(|c| {
            c.volumes
                .iter()
                .map(|v| Volume {
                    name: String::new(),
                    container_path: v.container_path.clone(),
                    host_path: v.host_path.clone(),
                    mode: v.mode.to_lowercase(),
                })
                .collect()
        })
        .unwrap_or_default();

    let tasks = app.tasks.as_deref().unwrap_or_default();
    let mut log_infos = log_infos.into_iter();
    let running_replicas = tasks
        .iter()
        .map(|task| {
            let status = replica_status(task);
            Replica {
                status: status.to_string(),
                endpoints: vec![format!("http://{}:{}/", task.host, concat_ports(&task.ports))],
                ports: task
                    .ports
                    .iter()
                    .map(|port| PortType {
                        port: *port,
                        protocol: "tcp".to_string(),
                    })
                    .collect(),
                containers: vec![Container {
                    image_url: image_url.clone(),
                    ports: container_ports.clone(),
                    status: status.to_string(),
                    log_info: log_infos.next().unwrap_or_default(),
                    volumes: volumes.clone(),
                }],
            }
        })
        .collect();

    Artifact {
        name: app.id.clone(),
        message,
        status,
        labels: app.labels.clone(),
        env: app
            .env
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
        running_replicas,
        requested_replicas: app.instances,
        cpus: app.cpus,
        memory: app.mem,
        endpoint: endpoint_for(&app.id, endpoint_pattern),
    }
}
