pub mod cli;
mod config;
mod replay;

#[allow(clippy::wildcard_imports)]
pub use cli::*;
pub use config::{ConfigArgs, ConfigCommands, handle_config};
pub use replay::{OutputFormat, ReplayArgs, ReplayScript, Step, handle_replay, run_script};
