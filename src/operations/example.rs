//! Parameters for the example analysis run

use crate::config::ExampleConfig;
use tracing::debug;

/// Resolved parameters for one example run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleParams {
    pub ticker: String,
    pub period: String,
    pub strategy: String,
}

impl Default for ExampleParams {
    fn default() -> Self {
        Self::from_config(&ExampleConfig::default())
    }
}

impl ExampleParams {
    /// Defaults taken from the example configuration
    #[must_use]
    pub fn from_config(config: &ExampleConfig) -> Self {
        Self {
            ticker: config.ticker.clone(),
            period: config.period.clone(),
            strategy: config.strategy.clone(),
        }
    }

    /// Apply `--ticker=`, `--period=` and `--strategy=` tokens over these values
    ///
    /// Matching is a case-sensitive prefix test and the value is everything
    /// after the first `=`, untrimmed. Later tokens overwrite earlier ones.
    /// Any other token, including `--ticker AAPL` without `=`, is ignored.
    #[must_use]
    pub fn with_args(mut self, tokens: &[String]) -> Self {
        for token in tokens {
            if let Some(value) = token.strip_prefix("--ticker=") {
                value.clone_into(&mut self.ticker);
            } else if let Some(value) = token.strip_prefix("--period=") {
                value.clone_into(&mut self.period);
            } else if let Some(value) = token.strip_prefix("--strategy=") {
                value.clone_into(&mut self.strategy);
            } else {
                debug!("Ignoring unrecognized example argument: {}", token);
            }
        }
        self
    }
}

/// Resolve example parameters from caller tokens over the built-in defaults
#[must_use]
pub fn parse_example_args(tokens: &[String]) -> ExampleParams {
    ExampleParams::default().with_args(tokens)
}
