//! CLI argument definitions using clap
//!
//! Commands:
//! - course-api serve [--config <path>] [--host <host>] [--port <port>]
//! - course-api check-config [--config <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// course-api - CRUD service for course records
#[derive(Parser, Debug)]
#[command(name = "course-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Print the effective configuration as JSON and exit
    CheckConfig(ServeArgs),
}

/// Settings layered over the config file. Each flag can also come from its
/// environment variable (or a `.env` file).
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "COURSES_HOST")]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Page size used when a list request does not ask for one
    #[arg(long, env = "PAGINATOR_LIMIT_DEFAULT")]
    pub paginator_limit_default: Option<usize>,

    /// PostgreSQL connection string; courses are kept in memory when unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
