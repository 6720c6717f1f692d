//! `devtask` - A CLI tool for running developer workflows
//!
//! This library maps workflow tasks (format, lint, test, clean, example,
//! verify, coverage, install, build) onto invocations of existing
//! command-line tools, and cleans build artifacts and cache files out of
//! the working tree.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use config::Config;
use operations::TaskOperation;
use system::{RealSystem, System};
use tracing::debug;

/// Main entry point for the devtask library
pub fn run(args: &Args) -> Result<()> {
    let system = RealSystem::new();
    run_with_system(args, &system)
}

/// Run the selected task against `system`
pub fn run_with_system(args: &Args, system: &dyn System) -> Result<()> {
    let config = Config::resolve(system, &args.config)?;
    debug!("Running task '{}'", args.task.name());

    let operation = TaskOperation::new(config, args.dry_run, system);
    operation.execute(&args.task)
}
