//! Gantry gateway library
//!
//! A backend-agnostic HTTP API for container deployments, translating each
//! call into operations on a pluggable scheduler backend.

pub mod app;
pub mod backend;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod logs;
pub mod models;
pub mod quantity;
pub mod server;
pub mod utils;
