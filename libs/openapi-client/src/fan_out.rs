//! Sequential multi-cluster execution

use std::future::Future;

use tracing::{error, info};

use crate::client::{ClientError, GatewayClient};
use crate::models::{Cluster, ClusterOutcome};

/// Run `op` against every cluster, one after the other.
///
/// A failing cluster is logged and recorded; the remaining clusters are
/// still attempted. Outcomes are returned in input order.
pub async fn fan_out<T, F, Fut>(
    clusters: &[Cluster],
    access_token: Option<&str>,
    mut op: F,
) -> Vec<ClusterOutcome<T, ClientError>>
where
    F: FnMut(GatewayClient) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut outcomes = Vec::with_capacity(clusters.len());

    for cluster in clusters {
        let result = match GatewayClient::new(&cluster.base_url) {
            Ok(client) => {
                let client = match access_token {
                    Some(token) => client.with_access_token(token),
                    None => client,
                };
                op(client).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => info!("Cluster {}: ok", cluster.name),
            Err(e) => error!("Cluster {}: {}", cluster.name, e),
        }

        outcomes.push(ClusterOutcome {
            cluster: cluster.name.clone(),
            result,
        });
    }

    outcomes
}
