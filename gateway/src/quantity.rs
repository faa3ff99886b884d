//! Memory quantity parsing
//!
//! Schedulers only take memory in megabytes, so caller input is limited to
//! a plain number of MB with an optional `MB` or `GB` suffix. `GB` scales
//! by 1000, not 1024.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::GatewayError;

const MEMORY_PATTERN: &str = r"^([0-9]*)(MB|GB)?$";

static MEMORY_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(MEMORY_PATTERN));

/// Parse a memory limit such as `"512"`, `"512MB"` or `"2GB"` into MB
pub fn parse_memory(raw: &str) -> Result<u64, GatewayError> {
    let re = MEMORY_RE
        .as_ref()
        .map_err(|e| GatewayError::ServerError(format!("invalid memory pattern: {}", e)))?;

    let caps = re
        .captures(raw)
        .ok_or_else(|| GatewayError::MalformedQuantity(format!("'{}' is not a memory amount", raw)))?;

    let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let value: u64 = digits
        .parse()
        .map_err(|_| GatewayError::MalformedQuantity(format!("'{}' has no numeric value", raw)))?;

    match caps.get(2).map(|m| m.as_str()) {
        Some("GB") => value
            .checked_mul(1000)
            .ok_or_else(|| GatewayError::MalformedQuantity(format!("'{}' is too large", raw))),
        _ => Ok(value),
    }
}
