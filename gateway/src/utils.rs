//! Utility functions

use serde::{Deserialize, Serialize};

/// Build information of the running gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Join integers without a separator, `[80, 443]` becomes `"80443"`
pub fn concat_ports(ports: &[u16]) -> String {
    ports.iter().map(|p| p.to_string()).collect()
}
