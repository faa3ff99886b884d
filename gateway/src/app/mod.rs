//! Process wiring: options, startup and shutdown

pub mod options;
pub mod run;
