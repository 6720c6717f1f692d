//! Workflow task coordination
//!
//! Each task is a fixed sequence of external tool invocations. The format
//! steps are fail-fast; everything else is best-effort.

use crate::cli::Task;
use crate::config::Config;
use crate::operations::clean::{CleanReport, WorkspaceCleaner};
use crate::operations::example::ExampleParams;
use crate::operations::invocation::{Invocation, Outcome, failed_steps, run_invocation};
use crate::system::System;
use anyhow::Result;
use tracing::{debug, info};

/// One step of a task: a progress message and the invocation it announces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub description: String,
    pub invocation: Invocation,
}

impl Step {
    fn new<S: Into<String>>(description: S, invocation: Invocation) -> Self {
        Self {
            description: description.into(),
            invocation,
        }
    }
}

/// Runs workflow tasks against a system
#[non_exhaustive]
pub struct TaskOperation<'src> {
    config: Config,
    dry_run: bool,
    system: &'src dyn System,
}

impl<'src> TaskOperation<'src> {
    /// Create a task runner over `system` with a resolved configuration
    #[must_use]
    pub fn new(config: Config, dry_run: bool, system: &'src dyn System) -> Self {
        Self {
            config,
            dry_run,
            system,
        }
    }

    /// Execute the selected task
    ///
    /// # Errors
    ///
    /// Returns an error if a fail-fast step fails, or if cleanup fails to
    /// remove one or more paths.
    pub fn execute(&self, task: &Task) -> Result<()> {
        match task {
            Task::Format => self.format(),
            Task::Lint => {
                self.lint()?;
                Ok(())
            }
            Task::Test { extra } => {
                self.test(extra)?;
                Ok(())
            }
            Task::Clean => {
                self.clean()?.into_result()?;
                Ok(())
            }
            Task::Example { extra } => {
                self.example(extra)?;
                Ok(())
            }
            Task::Verify { extra } => {
                if !extra.is_empty() {
                    debug!("verify does not forward arguments, ignoring: {:?}", extra);
                }
                self.verify()
            }
            Task::Coverage { extra } => {
                self.coverage(extra)?;
                Ok(())
            }
            Task::Install => {
                self.install()?;
                Ok(())
            }
            Task::Build => {
                self.build()?;
                Ok(())
            }
        }
    }

    /// Remove unused imports, reformat and sort imports, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns a command error if any formatter exits non-zero or cannot be launched.
    pub fn format(&self) -> Result<()> {
        self.run_steps(&format_steps(&self.config))?;
        info!("Code formatting complete");
        Ok(())
    }

    /// Run the style checker and the type checker regardless of their results
    ///
    /// # Errors
    ///
    /// Never fails on tool results; kept fallible for the launch primitive.
    pub fn lint(&self) -> Result<Vec<Outcome>> {
        let outcomes = self.run_steps(&lint_steps(&self.config))?;
        match failed_steps(&outcomes) {
            0 => info!("Linting complete"),
            failed => info!(
                "Linting complete, {} of {} checks reported issues",
                failed,
                outcomes.len()
            ),
        }
        Ok(outcomes)
    }

    /// Run the test suite, forwarding `extra` to the test runner
    ///
    /// # Errors
    ///
    /// Never fails on the test result.
    pub fn test(&self, extra: &[String]) -> Result<Outcome> {
        self.run_step(&test_step(&self.config, extra))
    }

    /// Remove build artifacts and cache entries under the working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined or listed.
    pub fn clean(&self) -> Result<CleanReport> {
        WorkspaceCleaner::in_current_dir(self.system, &self.config.clean, self.dry_run)?.clean()
    }

    /// Run the example analysis with parameters parsed from `tokens`
    ///
    /// # Errors
    ///
    /// Never fails on the example's result.
    pub fn example(&self, tokens: &[String]) -> Result<Outcome> {
        let params = ExampleParams::from_config(&self.config.example).with_args(tokens);
        self.run_step(&example_step(&self.config, &params))
    }

    /// Format, lint, then build the package
    ///
    /// # Errors
    ///
    /// Returns a command error if formatting fails; lint and build are not
    /// attempted in that case.
    pub fn verify(&self) -> Result<()> {
        info!("Running pre-build verification...");

        info!("Formatting code...");
        self.format()?;

        info!("Linting code...");
        self.lint()?;

        self.build()?;

        info!("Verification and build complete");
        Ok(())
    }

    /// Run the test suite under coverage and render the HTML report
    ///
    /// # Errors
    ///
    /// Never fails on tool results.
    pub fn coverage(&self, extra: &[String]) -> Result<Vec<Outcome>> {
        self.run_steps(&coverage_steps(&self.config, extra))
    }

    /// Install the package in development mode
    ///
    /// # Errors
    ///
    /// Never fails on the installer's result.
    pub fn install(&self) -> Result<Outcome> {
        self.run_step(&install_step(&self.config))
    }

    /// Build the distributable package
    ///
    /// # Errors
    ///
    /// Never fails on the builder's result.
    pub fn build(&self) -> Result<Outcome> {
        self.run_step(&build_step(&self.config))
    }

    fn run_steps(&self, steps: &[Step]) -> Result<Vec<Outcome>> {
        steps.iter().map(|step| self.run_step(step)).collect()
    }

    fn run_step(&self, step: &Step) -> Result<Outcome> {
        info!("{}", step.description);
        run_invocation(self.system, &step.invocation, self.dry_run)
    }
}

/// autoflake, black and isort over the source roots, all fail-fast
#[must_use]
pub fn format_steps(config: &Config) -> Vec<Step> {
    let tools = &config.tools;
    let mut autoflake_args: Vec<String> = [
        "--recursive",
        "--remove-all-unused-imports",
        "--remove-unused-variables",
        "--in-place",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect();
    autoflake_args.extend(config.sources.iter().cloned());

    vec![
        Step::new(
            format!("Removing unused imports with {}...", tools.autoflake),
            Invocation::fail_fast(&tools.autoflake, autoflake_args),
        ),
        Step::new(
            format!("Formatting code with {}...", tools.black),
            Invocation::fail_fast(&tools.black, &config.sources),
        ),
        Step::new(
            format!("Sorting imports with {}...", tools.isort),
            Invocation::fail_fast(&tools.isort, &config.sources),
        ),
    ]
}

/// Style checker over the source roots, type checker over the package
#[must_use]
pub fn lint_steps(config: &Config) -> Vec<Step> {
    let tools = &config.tools;
    vec![
        Step::new(
            format!("Running {}...", tools.flake8),
            Invocation::best_effort(&tools.flake8, &config.sources),
        ),
        Step::new(
            format!("Running {}...", tools.mypy),
            Invocation::best_effort(&tools.mypy, [&config.package]),
        ),
    ]
}

/// Test runner over the test root with `extra` appended verbatim
#[must_use]
pub fn test_step(config: &Config, extra: &[String]) -> Step {
    let invocation =
        Invocation::best_effort(&config.tools.pytest, [&config.test_root]).with_extra_args(extra);
    Step::new(
        format!("Running tests: {}", invocation.to_command_line()),
        invocation,
    )
}

/// The package's own entry point with resolved example parameters
#[must_use]
pub fn example_step(config: &Config, params: &ExampleParams) -> Step {
    let example = &config.example;
    let invocation = Invocation::best_effort(
        &example.interpreter,
        [
            "-m",
            config.package.as_str(),
            example.subcommand.as_str(),
            "--ticker",
            params.ticker.as_str(),
            "--period",
            params.period.as_str(),
            "--strategy",
            params.strategy.as_str(),
        ],
    );
    Step::new(
        format!("Running example: {}", invocation.to_command_line()),
        invocation,
    )
}

/// Test runner with coverage, then the HTML report
#[must_use]
pub fn coverage_steps(config: &Config, extra: &[String]) -> Vec<Step> {
    let tools = &config.tools;
    let run = Invocation::best_effort(
        &tools.pytest,
        [format!("--cov={}", config.package), config.test_root.clone()],
    )
    .with_extra_args(extra);

    vec![
        Step::new(
            format!("Running tests with coverage: {}", run.to_command_line()),
            run,
        ),
        Step::new(
            "Generating HTML coverage report...",
            Invocation::best_effort(&tools.coverage, ["html"]),
        ),
    ]
}

/// Editable install of the project
#[must_use]
pub fn install_step(config: &Config) -> Step {
    Step::new(
        "Installing package in development mode...",
        Invocation::best_effort(&config.tools.pip, ["install", "-e", "."]),
    )
}

/// Package build, no arguments forwarded
#[must_use]
pub fn build_step(config: &Config) -> Step {
    Step::new(
        "Building package...",
        Invocation::best_effort(&config.tools.poetry, ["build"]),
    )
}
