use crate::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};

/// Command-line arguments for devtask
#[derive(Parser, Debug, Clone)]
#[command(name = "devtask")]
#[command(about = "A CLI tool for running format, lint, test, clean and build workflows")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    // Not global: every token after the task name belongs to the task.

    /// Configuration file path
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_PATH,
        env = "DEVTASK_CONFIG"
    )]
    pub config: String,

    /// Print commands and paths instead of executing or removing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Task to run
    #[command(subcommand)]
    pub task: Task,
}

/// Workflow tasks
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Remove unused imports, format code and sort imports (stops at the first failure)
    Format,

    /// Run the style checker and the type checker
    Lint,

    /// Run the test suite; extra arguments go to the test runner
    Test {
        /// Arguments appended verbatim to the test runner
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        extra: Vec<String>,
    },

    /// Remove build artifacts and cache files
    Clean,

    /// Run an example analysis (--ticker=, --period=, --strategy=)
    Example {
        /// `--ticker=VALUE`, `--period=VALUE` or `--strategy=VALUE`; anything else is ignored
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        extra: Vec<String>,
    },

    /// Format, lint, then build the package
    Verify {
        /// Accepted and ignored
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "ARGS",
            hide = true
        )]
        extra: Vec<String>,
    },

    /// Run the test suite with coverage and generate an HTML report
    Coverage {
        /// Arguments appended verbatim to the test runner
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        extra: Vec<String>,
    },

    /// Install the package in development mode
    Install,

    /// Build the package
    Build,
}

impl Task {
    /// Task name as typed on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match *self {
            Self::Format => "format",
            Self::Lint => "lint",
            Self::Test { .. } => "test",
            Self::Clean => "clean",
            Self::Example { .. } => "example",
            Self::Verify { .. } => "verify",
            Self::Coverage { .. } => "coverage",
            Self::Install => "install",
            Self::Build => "build",
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(core::iter::once("devtask").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_extra_args_are_verbatim() {
        let args = parse(&["test", "-x", "--lf", "-k", "not slow"]);
        assert_eq!(
            args.task,
            Task::Test {
                extra: vec![
                    "-x".to_owned(),
                    "--lf".to_owned(),
                    "-k".to_owned(),
                    "not slow".to_owned()
                ]
            }
        );
    }

    #[test]
    fn test_example_tokens_are_captured() {
        let args = parse(&["example", "--ticker=AAPL", "junk", "--period=week"]);
        assert_eq!(
            args.task,
            Task::Example {
                extra: vec![
                    "--ticker=AAPL".to_owned(),
                    "junk".to_owned(),
                    "--period=week".to_owned()
                ]
            }
        );
    }

    #[test]
    fn test_options_before_task() {
        let args = parse(&["--dry-run", "-v", "lint"]);
        assert!(args.dry_run);
        assert!(args.verbose);
        assert_eq!(args.task, Task::Lint);
    }

    #[test]
    fn test_option_names_after_task_are_forwarded() {
        let args = parse(&["test", "-v", "--dry-run"]);
        assert!(!args.verbose);
        assert!(!args.dry_run);
        assert_eq!(
            args.task,
            Task::Test {
                extra: vec!["-v".to_owned(), "--dry-run".to_owned()]
            }
        );

        let args = parse(&["coverage", "--config", "x.yaml"]);
        assert_eq!(args.config, DEFAULT_CONFIG_PATH);
        assert_eq!(
            args.task,
            Task::Coverage {
                extra: vec!["--config".to_owned(), "x.yaml".to_owned()]
            }
        );
    }

    #[test]
    fn test_options_after_argless_task_rejected() {
        assert!(Args::try_parse_from(["devtask", "lint", "-v"]).is_err());
    }

    #[test]
    fn test_config_flag() {
        let args = parse(&["--config", "other.yaml", "clean"]);
        assert_eq!(args.config, "other.yaml");
        assert_eq!(args.task.name(), "clean");
    }

    #[test]
    fn test_unknown_task_rejected() {
        assert!(Args::try_parse_from(["devtask", "deploy"]).is_err());
    }

    #[test]
    fn test_clean_takes_no_arguments() {
        assert!(Args::try_parse_from(["devtask", "clean", "extra"]).is_err());
    }
}
