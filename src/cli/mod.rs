//! CLI module for course-api
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - check-config: Print the resolved configuration

mod args;
mod commands;
mod errors;
mod logging;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{check_config, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use logging::{init_subscriber, Verbosity};
