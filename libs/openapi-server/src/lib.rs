//! Wire models of the gantry HTTP API.

pub mod models;

pub use models::*;
