//! CLI command implementations

use std::io::{self, Write};
use std::sync::Arc;

use tracing::{info, warn};

use crate::course::{CourseRepository, CourseService, InMemoryCourseRepository, PgCourseRepository};
use crate::http_server::{HttpServer, ServerConfig};

use super::args::{Cli, Command, ServeArgs};
use super::errors::{CliError, CliResult};
use super::logging::{init_subscriber, Verbosity};

/// Parse arguments, set up logging and dispatch
pub fn run() -> CliResult<()> {
    // .env is optional
    let _ = dotenv::dotenv();

    let cli = Cli::parse_args();
    init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::CheckConfig(args) => check_config(&args),
    }
}

/// Defaults, then the config file, then flags/environment
pub fn resolve_config(args: &ServeArgs) -> CliResult<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(limit) = args.paginator_limit_default {
        config.paginator_limit_default = limit;
    }
    if let Some(url) = &args.database_url {
        config.database_url = Some(url.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn open_repository(config: &ServerConfig) -> CliResult<Arc<dyn CourseRepository>> {
    match &config.database_url {
        Some(url) => {
            info!("using PostgreSQL course store");
            Ok(Arc::new(PgCourseRepository::connect(url).await?))
        }
        None => {
            warn!("DATABASE_URL not set, courses are kept in memory");
            Ok(Arc::new(InMemoryCourseRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// Start the HTTP server and block until it stops
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    let config = resolve_config(args)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::server_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let repository = open_repository(&config).await?;
        let service = CourseService::new(repository);

        HttpServer::new(config, service)
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::server_error(format!("HTTP server failed: {}", e)))
    })
}

/// Print the resolved configuration, with the database URL redacted
pub fn check_config(args: &ServeArgs) -> CliResult<()> {
    let mut config = resolve_config(args)?;
    if config.database_url.is_some() {
        config.database_url = Some("<redacted>".to_string());
    }

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &config)?;
    writeln!(stdout)?;
    Ok(())
}
