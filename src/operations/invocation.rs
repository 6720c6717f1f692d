//! External tool invocation with fail-fast and best-effort policies

use crate::error::TaskError;
use crate::system::System;
use anyhow::Result;
use tracing::{debug, info, warn};

/// What a failing invocation does to the enclosing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// A non-zero exit aborts the remaining steps
    FailFast,
    /// The exit code is reported and ignored
    BestEffort,
}

/// One external process launch: program, arguments and failure policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub policy: Policy,
}

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exited with code zero
    Succeeded,
    /// Exited non-zero or was killed by a signal; `None` for signals
    Failed(Option<i32>),
    /// The program could not be launched at all
    NotLaunched,
    /// Printed instead of executed
    Skipped,
}

impl Outcome {
    /// Whether the tool ran and reported success
    #[must_use]
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(*self, Self::Succeeded | Self::Skipped)
    }
}

/// Number of outcomes that did not end in success
#[must_use]
pub fn failed_steps(outcomes: &[Outcome]) -> usize {
    outcomes.iter().filter(|outcome| !outcome.is_success()).count()
}

impl Invocation {
    /// Create an invocation of `program` with `args`
    pub fn new<P, I, S>(program: P, args: I, policy: Policy) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            policy,
        }
    }

    /// Fail-fast invocation of `program`
    pub fn fail_fast<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, Policy::FailFast)
    }

    /// Best-effort invocation of `program`
    pub fn best_effort<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, Policy::BestEffort)
    }

    /// Append caller-supplied arguments verbatim, in order
    #[must_use]
    pub fn with_extra_args(mut self, extra: &[String]) -> Self {
        self.args.extend(extra.iter().cloned());
        self
    }

    /// Shell-escaped command line, for display and dry runs
    #[must_use]
    pub fn to_command_line(&self) -> String {
        core::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_escape)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run a single invocation, applying its policy
///
/// With `dry_run` the command line is printed and nothing is launched.
///
/// # Errors
///
/// Returns a command error when a fail-fast invocation exits non-zero or
/// cannot be launched. Best-effort invocations never return an error.
pub fn run_invocation(
    system: &dyn System,
    invocation: &Invocation,
    dry_run: bool,
) -> Result<Outcome> {
    let command_line = invocation.to_command_line();

    if dry_run {
        println!("{command_line}");
        return Ok(Outcome::Skipped);
    }

    debug!("Executing: {}", command_line);

    let outcome = match system.run_command(&invocation.program, &invocation.args) {
        Ok(status) if status.success() => Outcome::Succeeded,
        Ok(status) => Outcome::Failed(status.code),
        Err(err) => {
            if invocation.policy == Policy::FailFast {
                return Err(TaskError::command(format!(
                    "Failed to launch '{}': {err}\nCommand: {command_line}",
                    invocation.program
                ))
                .into());
            }
            warn!("Could not launch '{}': {}", invocation.program, err);
            return Ok(Outcome::NotLaunched);
        }
    };

    if let Outcome::Failed(code) = outcome {
        let code_text = code.map_or_else(|| "a signal".to_owned(), |c| format!("code {c}"));
        match invocation.policy {
            Policy::FailFast => {
                return Err(TaskError::command(format!(
                    "'{}' failed with {code_text}\nCommand: {command_line}",
                    invocation.program
                ))
                .into());
            }
            Policy::BestEffort => {
                info!("'{}' exited with {}, continuing", invocation.program, code_text);
            }
        }
    }

    Ok(outcome)
}

/// Escape a string for shell usage
///
/// Uses double quotes for safety, escaping special characters inside
fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '/' | '.' | ':' | '=' | ',' | '+' | '@')
        })
    {
        return s.to_owned();
    }

    let mut result = String::from('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str(r#"\""#),
            '\\' => result.push_str(r"\\"),
            '$' => result.push_str(r"\$"),
            '`' => result.push_str(r"\`"),
            '!' => result.push_str(r"\!"),
            _ => result.push(ch),
        }
    }
    result.push('"');
    result
}
