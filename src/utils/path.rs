//! Path manipulation and validation utilities

use crate::error::TaskError;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading '..' components, they escape the base
                if matches!(components.last(), None | Some(Component::ParentDir)) {
                    components.push(component);
                } else {
                    components.pop();
                }
            }
            _ => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Validate that a configured path stays inside the working directory
///
/// # Errors
///
/// Returns a configuration error if the path is empty, absolute, or
/// escapes the working directory through `..` components.
pub fn validate_path_safety(path: &str) -> Result<()> {
    let path_obj = Path::new(path);

    if path.trim().is_empty() {
        return Err(TaskError::configuration("Path cannot be empty").into());
    }

    if path_obj.is_absolute() || path_obj.has_root() {
        return Err(TaskError::configuration(format!(
            "Absolute paths are not allowed: '{path}'"
        ))
        .into());
    }

    let normalized = normalize_path(path_obj);
    if normalized.as_os_str().is_empty() {
        return Err(TaskError::configuration(format!(
            "Path resolves to the working directory itself: '{path}'"
        ))
        .into());
    }

    if normalized.starts_with("..") {
        return Err(TaskError::configuration(format!(
            "Path contains unsafe directory traversal: '{path}' -> '{}'",
            normalized.display()
        ))
        .into());
    }

    Ok(())
}

/// Render `path` relative to `base` in `./sub/dir` form for progress messages
///
/// Paths outside `base` are rendered unchanged.
#[must_use]
pub fn display_relative(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_owned(),
        Ok(relative) => format!("./{}", relative.display()),
        Err(_) => path.display().to_string(),
    }
}
