//! Client for the gantry deployment gateway.
//!
//! Talks to one or more gateway instances (clusters) over the HTTP contract
//! described in `openapi-server`.

pub mod client;
pub mod fan_out;
pub mod models;

pub use client::{ClientError, GatewayClient};
pub use fan_out::fan_out;
pub use models::{Cluster, ClusterOutcome};
