//! Configuration validation logic

use crate::config::Config;
use crate::error::TaskError;
use crate::utils::path::validate_path_safety;
use anyhow::{Context as _, Result};

/// Validate a complete configuration
///
/// # Errors
///
/// Returns a configuration error if:
/// - A program, package or root name is blank
/// - There is no source root
/// - A source root or artifact path is absolute or escapes the working directory
/// - A cleaner name pattern contains a path separator
#[inline]
pub fn validate_config(config: &Config) -> Result<()> {
    require_name("package", &config.package)?;

    if config.sources.is_empty() {
        return Err(TaskError::configuration("At least one source root is required").into());
    }

    for (index, source) in config.sources.iter().enumerate() {
        validate_path_safety(source).with_context(|| format!("Source root #{}", index + 1))?;
    }

    validate_path_safety(&config.test_root).context("Test root")?;

    require_name("example.interpreter", &config.example.interpreter)?;
    require_name("example.subcommand", &config.example.subcommand)?;

    for (key, program) in config.tools.entries() {
        require_name(&format!("tools.{key}"), program)?;
    }

    for (index, artifact) in config.clean.artifacts.iter().enumerate() {
        validate_path_safety(artifact)
            .with_context(|| format!("Artifact path #{}", index + 1))?;
    }

    require_pattern("clean.artifactSuffix", &config.clean.artifact_suffix)?;
    require_pattern("clean.cacheDir", &config.clean.cache_dir)?;
    require_pattern("clean.cacheSuffix", &config.clean.cache_suffix)?;

    Ok(())
}

fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TaskError::configuration(format!("'{field}' cannot be empty")).into());
    }
    Ok(())
}

/// Name patterns match a single path component
fn require_pattern(field: &str, value: &str) -> Result<()> {
    require_name(field, value)?;
    if value.contains('/') || value.contains('\\') {
        return Err(TaskError::configuration(format!(
            "'{field}' must be a file name pattern, not a path: '{value}'"
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_escaping_artifact_rejected() {
        let mut config = Config::default();
        config.clean.artifacts.push("../outside".to_owned());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("Artifact path #7"));
    }

    #[test]
    fn test_absolute_source_rejected() {
        let mut config = Config::default();
        config.sources = vec!["/usr/lib".to_owned()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_no_sources_rejected() {
        let mut config = Config::default();
        config.sources.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_cache_dir_with_separator_rejected() {
        let mut config = Config::default();
        config.clean.cache_dir = "a/__pycache__".to_owned();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_blank_tool_rejected() {
        let mut config = Config::default();
        config.tools.poetry = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("tools.poetry"));
    }
}
