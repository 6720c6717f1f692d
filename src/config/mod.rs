//! Configuration management module
//!
//! Handles YAML configuration parsing, JSON schema validation, and the
//! built-in defaults used when no configuration file is present

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::system::System;
use serde::{Deserialize, Serialize};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "./devtask.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Importable package name, used by the type checker, coverage and the example runner
    pub package: String,

    /// Source roots handed to the formatters and the style checker
    pub sources: Vec<String>,

    /// Root directory handed to the test runner
    pub test_root: String,

    /// Example runner settings
    pub example: ExampleConfig,

    /// External program names
    pub tools: ToolsConfig,

    /// Workspace cleaner settings
    pub clean: CleanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: "stonkwise".to_owned(),
            sources: vec!["stonkwise".to_owned(), "tests".to_owned()],
            test_root: "tests/".to_owned(),
            example: ExampleConfig::default(),
            tools: ToolsConfig::default(),
            clean: CleanConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the
    /// default configuration file is absent
    pub fn resolve(system: &dyn System, path: &str) -> anyhow::Result<Self> {
        yaml::resolve_config(system, path)
    }

    /// Validate configuration logic
    pub fn validate(&self) -> anyhow::Result<()> {
        validation::validate_config(self)
    }
}

/// Settings for the example analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExampleConfig {
    /// Interpreter used to launch the package entry point
    pub interpreter: String,
    /// Subcommand passed to the package entry point
    pub subcommand: String,
    pub ticker: String,
    pub period: String,
    pub strategy: String,
}

impl Default for ExampleConfig {
    fn default() -> Self {
        Self {
            interpreter: "python".to_owned(),
            subcommand: "analyze".to_owned(),
            ticker: "MSFT".to_owned(),
            period: "day".to_owned(),
            strategy: "simple".to_owned(),
        }
    }
}

/// Program names for every external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub autoflake: String,
    pub black: String,
    pub isort: String,
    pub flake8: String,
    pub mypy: String,
    pub pytest: String,
    pub coverage: String,
    pub pip: String,
    pub poetry: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            autoflake: "autoflake".to_owned(),
            black: "black".to_owned(),
            isort: "isort".to_owned(),
            flake8: "flake8".to_owned(),
            mypy: "mypy".to_owned(),
            pytest: "pytest".to_owned(),
            coverage: "coverage".to_owned(),
            pip: "pip".to_owned(),
            poetry: "poetry".to_owned(),
        }
    }
}

impl ToolsConfig {
    /// Every configured program name with its key, for validation messages
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("autoflake", self.autoflake.as_str()),
            ("black", self.black.as_str()),
            ("isort", self.isort.as_str()),
            ("flake8", self.flake8.as_str()),
            ("mypy", self.mypy.as_str()),
            ("pytest", self.pytest.as_str()),
            ("coverage", self.coverage.as_str()),
            ("pip", self.pip.as_str()),
            ("poetry", self.poetry.as_str()),
        ]
    }
}

/// Paths and name patterns removed by the workspace cleaner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CleanConfig {
    /// Fixed artifact paths, relative to the working directory
    pub artifacts: Vec<String>,
    /// Top-level directories ending with this suffix are removed
    pub artifact_suffix: String,
    /// Directories with this exact name are removed anywhere in the tree
    pub cache_dir: String,
    /// Files ending with this suffix are removed anywhere in the tree
    pub cache_suffix: String,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            artifacts: [
                "build/",
                "dist/",
                ".pytest_cache/",
                ".mypy_cache/",
                "htmlcov/",
                ".coverage",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            artifact_suffix: ".egg-info".to_owned(),
            cache_dir: "__pycache__".to_owned(),
            cache_suffix: ".pyc".to_owned(),
        }
    }
}
