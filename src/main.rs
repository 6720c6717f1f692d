//! # `devtask`
//!
//! `devtask` runs a project's developer workflow by delegating to the
//! usual third-party tools: formatters, linters, the test runner and the
//! package builder. It also cleans build artifacts and bytecode caches out
//! of the working tree.
//!
//! ## Usage
//!
//! ```sh
//! devtask format
//! devtask lint
//! devtask test -k market -x
//! devtask example --ticker=AAPL --period=week
//! devtask verify
//! devtask --dry-run clean
//! ```
//!
//! Tool names, source roots and cleanup patterns can be overridden in a
//! `devtask.yaml` file (see `docs/schema.json`).

use clap::Parser as _;
use devtask::cli::Args;
use devtask::error::TaskError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match devtask::run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<TaskError>()
                    .map_or(1, TaskError::exit_code),
            );
        }
    }
}
