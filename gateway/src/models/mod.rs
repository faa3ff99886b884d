//! Domain model
//!
//! Value types exchanged between the gateway facade and the backends. The
//! wire-facing types live in `openapi-server` and are re-exported here.

pub mod deployment;

pub use deployment::{
    Action, ArtifactRequest, BaseRequest, DeploymentRequest, Identity, LabelFilter, ScaleRequest,
};
pub use openapi_server::models::{
    Artifact, Container, DeploymentSpec, PortType, Replica, StringMap, Volume,
};
