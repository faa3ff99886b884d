//! Server state

use std::sync::Arc;

use crate::gateway::Gateway;

/// Server state shared across handlers
pub struct ServerState {
    pub gateway: Arc<Gateway>,
}

impl ServerState {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}
