//! Gateway configuration

pub mod settings;

pub use settings::{
    BackendSettings, BasicAuthSettings, LogShippingSettings, MarathonSettings, ServerSettings,
    Settings,
};
