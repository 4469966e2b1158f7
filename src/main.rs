//! course-api entry point
//!
//! Parsing, configuration and serving all live in the CLI module; this only
//! reports a failure and exits non-zero.

use course_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
