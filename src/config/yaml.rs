//! YAML configuration loading and parsing

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::error::TaskError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use tracing::debug;

/// Load configuration from `path`, or the built-in defaults when `path` is
/// the default location and no file exists there
pub fn resolve_config(system: &dyn System, path: &str) -> Result<Config> {
    let full_path = system
        .current_dir()
        .context("Failed to determine the working directory")?
        .join(path);

    if path == DEFAULT_CONFIG_PATH && !system.exists(&full_path) {
        debug!("No configuration file at {}, using defaults", path);
        return Ok(Config::default());
    }

    load_config(system, path)
}

/// Load and parse YAML configuration from file
pub fn load_config(system: &dyn System, path: &str) -> Result<Config> {
    let full_path = system
        .current_dir()
        .context("Failed to determine the working directory")?
        .join(path);

    if !system.exists(&full_path) {
        return Err(TaskError::configuration(format!(
            "Configuration file not found: {path}\n\
            Create a devtask.yaml file or specify a different path with --config"
        ))
        .into());
    }

    let content = system
        .read_to_string(&full_path)
        .with_context(|| format!("Failed to read configuration file: {path}"))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid configuration in file: {path}"))?;

    debug!("Loaded configuration from {}", path);
    Ok(config)
}

/// Parse, schema-check and validate configuration text
///
/// An empty document yields the default configuration.
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: Value = serde_yaml::from_str(content).map_err(|e| {
        TaskError::configuration(format!(
            "Failed to parse YAML: {e}\n\
            Please check the syntax and structure of your configuration file"
        ))
    })?;

    let raw = if raw.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        raw
    };

    crate::config::schema::validate_against_schema(&raw)
        .map_err(|e| TaskError::configuration(e.to_string()))?;

    let config: Config = serde_json::from_value(raw)
        .map_err(|e| TaskError::configuration(format!("Failed to read configuration: {e}")))?;

    config.validate()?;

    Ok(config)
}
