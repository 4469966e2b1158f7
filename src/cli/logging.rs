//! Tracing subscriber setup for the CLI.
//!
//! Filter priority, highest first: `COURSES_LOG`, `RUST_LOG`, then the
//! `--verbose` / `--quiet` flags. Logs are written to stderr.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "COURSES_LOG";

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Verbose wins when both flags are given.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_subscriber(verbosity: Verbosity) {
    let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_tty)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer)
        .try_init();
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // An unparseable COURSES_LOG falls through to RUST_LOG.
    if let Some(filter) = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = verbosity.default_level();
    let directive = match verbosity {
        // sqlx logs every statement at info
        Verbosity::Normal => format!("{level},sqlx=warn"),
        _ => level.to_string(),
    };

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
    }

    #[test]
    fn default_level_mapping() {
        assert_eq!(Verbosity::Quiet.default_level(), Level::ERROR);
        assert_eq!(Verbosity::Normal.default_level(), Level::INFO);
        assert_eq!(Verbosity::Verbose.default_level(), Level::DEBUG);
    }

    #[test]
    fn build_env_filter_produces_valid_filter() {
        let _filter = build_env_filter(Verbosity::Normal);
        let _filter = build_env_filter(Verbosity::Verbose);
        let _filter = build_env_filter(Verbosity::Quiet);
    }
}
