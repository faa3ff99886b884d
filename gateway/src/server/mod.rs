//! HTTP layer
//!
//! Decodes requests, calls the gateway and serializes its results. Status
//! codes come from [`crate::errors::GatewayError`].

pub mod handlers;
pub mod serve;
pub mod state;

pub use serve::{build_router, serve};
pub use state::ServerState;
