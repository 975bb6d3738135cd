pub mod analyze;
pub mod args;
pub mod config;

pub use analyze::{handle_analyze_command, handle_normalize_command, read_input};
pub use args::{Cli, CliCommand, ServeCliArgs, TextInputArgs};
pub use config::handle_config_command;
