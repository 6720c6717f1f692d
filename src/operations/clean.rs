//! Workspace cleanup: build artifacts and transient cache entries
//!
//! Cleanup runs in two passes. The artifact pass removes a fixed list of
//! top-level paths plus every top-level directory carrying the packaging
//! metadata suffix. The cache pass then walks the whole tree once and
//! removes cache directories and compiled bytecode files. The artifact pass
//! always completes before the walk starts.

use crate::config::CleanConfig;
use crate::error::TaskError;
use crate::system::{System, WalkControl};
use crate::utils::fs::{Removal, name_ends_with, name_equals, remove_entry};
use crate::utils::path::display_relative;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a cleanup run removed, or failed to remove
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Removed paths, in removal order (would-be removals in a dry run)
    pub removed: Vec<PathBuf>,
    /// Paths whose removal failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanReport {
    /// Turn removal failures into a filesystem error
    ///
    /// # Errors
    ///
    /// Returns a filesystem error listing every path that could not be removed.
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            return Ok(self);
        }

        let details: Vec<String> = self
            .failed
            .iter()
            .map(|(path, err)| format!("  - {}: {err}", path.display()))
            .collect();

        Err(TaskError::filesystem(format!(
            "Failed to remove {} path(s):\n{}",
            self.failed.len(),
            details.join("\n")
        ))
        .into())
    }
}

/// Removes build artifacts and cache entries under a root directory
pub struct WorkspaceCleaner<'src> {
    system: &'src dyn System,
    config: &'src CleanConfig,
    root: PathBuf,
    dry_run: bool,
}

impl<'src> WorkspaceCleaner<'src> {
    /// Create a cleaner rooted at `root`
    #[must_use]
    pub fn new(
        system: &'src dyn System,
        config: &'src CleanConfig,
        root: PathBuf,
        dry_run: bool,
    ) -> Self {
        Self {
            system,
            config,
            root,
            dry_run,
        }
    }

    /// Create a cleaner rooted at the current working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn in_current_dir(
        system: &'src dyn System,
        config: &'src CleanConfig,
        dry_run: bool,
    ) -> Result<Self> {
        let root = system
            .current_dir()
            .context("Failed to determine the working directory")?;
        Ok(Self::new(system, config, root, dry_run))
    }

    /// Run both passes and report what was removed
    ///
    /// Removal failures are logged and collected in the report; they do not
    /// stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory itself cannot be listed.
    pub fn clean(&self) -> Result<CleanReport> {
        let mut report = CleanReport::default();

        let artifacts = self.artifact_paths()?;
        for path in &artifacts {
            self.remove(path, &mut report);
        }

        self.remove_cache_entries(&artifacts, &mut report)?;

        info!(
            "Clean complete: {} path(s) {}",
            report.removed.len(),
            if self.dry_run { "would be removed" } else { "removed" }
        );
        Ok(report)
    }

    /// Fixed artifact paths followed by suffix-matched top-level directories
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be listed.
    pub fn artifact_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = fixed_artifact_paths(&self.root, self.config);
        paths.extend(suffix_artifact_paths(
            self.system,
            &self.root,
            &self.config.artifact_suffix,
        )?);
        Ok(paths)
    }

    fn remove_cache_entries(&self, artifacts: &[PathBuf], report: &mut CleanReport) -> Result<()> {
        self.system
            .walk_dir(&self.root, &mut |entry| {
                // Already targeted. Only a dry run still finds these on disk.
                if artifacts.iter().any(|dir| entry.path.starts_with(dir)) {
                    return WalkControl::SkipSubtree;
                }

                if entry.is_dir && name_equals(&entry.path, &self.config.cache_dir) {
                    self.remove(&entry.path, report);
                    return WalkControl::SkipSubtree;
                }
                if entry.is_file && name_ends_with(&entry.path, &self.config.cache_suffix) {
                    self.remove(&entry.path, report);
                }
                WalkControl::Descend
            })
            .with_context(|| format!("Failed to walk directory: {}", self.root.display()))
    }

    fn remove(&self, path: &Path, report: &mut CleanReport) {
        let shown = display_relative(path, &self.root);

        if self.dry_run {
            if self.system.exists(path) {
                info!("Would remove {}", shown);
                report.removed.push(path.to_path_buf());
            }
            return;
        }

        match remove_entry(self.system, path) {
            Ok(Removal::Removed) => {
                info!("Removed {}", shown);
                report.removed.push(path.to_path_buf());
            }
            Ok(Removal::Absent) => {
                debug!("Nothing to remove at {}", shown);
            }
            Err(err) => {
                warn!("Failed to remove {}: {}", shown, err);
                report.failed.push((path.to_path_buf(), err.to_string()));
            }
        }
    }
}

/// Configured artifact paths joined onto `root`, in configuration order
#[must_use]
pub fn fixed_artifact_paths(root: &Path, config: &CleanConfig) -> Vec<PathBuf> {
    config
        .artifacts
        .iter()
        .map(|artifact| root.join(artifact))
        .collect()
}

/// Immediate child directories of `root` whose name ends with `suffix`, sorted
///
/// # Errors
///
/// Returns an error if `root` cannot be listed.
pub fn suffix_artifact_paths(
    system: &dyn System,
    root: &Path,
    suffix: &str,
) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = system
        .read_dir(root)
        .with_context(|| format!("Failed to read directory: {}", root.display()))?
        .into_iter()
        .filter(|path| name_ends_with(path, suffix) && system.is_dir(path))
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    fn workspace() -> MockSystem {
        MockSystem::new().with_current_dir("/work").unwrap()
    }

    #[test]
    fn fixed_paths_follow_configuration_order() {
        let config = CleanConfig::default();
        let paths = fixed_artifact_paths(Path::new("/work"), &config);
        assert_eq!(paths.len(), 6);
        assert_eq!(paths[0], PathBuf::from("/work/build"));
        assert_eq!(paths[5], PathBuf::from("/work/.coverage"));
    }

    #[test]
    fn suffix_scan_is_top_level_directories_only() {
        let system = workspace()
            .with_dir("/work/stonkwise.egg-info")
            .unwrap()
            .with_dir("/work/nested/other.egg-info")
            .unwrap()
            .with_file("/work/notes.egg-info", b"")
            .unwrap();

        let paths = suffix_artifact_paths(&system, Path::new("/work"), ".egg-info").unwrap();
        assert_eq!(paths, vec![PathBuf::from("/work/stonkwise.egg-info")]);
    }

    #[test]
    fn artifacts_then_cache_entries_are_removed() {
        let system = workspace()
            .with_file("/work/build/lib/mod.py", b"")
            .unwrap()
            .with_file("/work/.coverage", b"")
            .unwrap()
            .with_dir("/work/stonkwise.egg-info")
            .unwrap()
            .with_file("/work/stonkwise/__pycache__/core.cpython-311.pyc", b"")
            .unwrap()
            .with_file("/work/stonkwise/stray.pyc", b"")
            .unwrap()
            .with_file("/work/stonkwise/core.py", b"")
            .unwrap();
        let config = CleanConfig::default();

        let cleaner = WorkspaceCleaner::in_current_dir(&system, &config, false).unwrap();
        let report = cleaner.clean().unwrap();

        assert_eq!(
            report.removed,
            vec![
                PathBuf::from("/work/build/"),
                PathBuf::from("/work/.coverage"),
                PathBuf::from("/work/stonkwise.egg-info"),
                PathBuf::from("/work/stonkwise/__pycache__"),
                PathBuf::from("/work/stonkwise/stray.pyc"),
            ]
        );
        assert!(report.failed.is_empty());
        assert!(system.exists(Path::new("/work/stonkwise/core.py")));
        assert!(!system.exists(Path::new("/work/build")));
    }

    #[test]
    fn pyc_inside_cache_dir_is_not_reported_twice() {
        let system = workspace()
            .with_file("/work/a/__pycache__/x.pyc", b"")
            .unwrap()
            .with_file("/work/a/__pycache__/__pycache__/y.pyc", b"")
            .unwrap();
        let config = CleanConfig::default();

        let report = WorkspaceCleaner::in_current_dir(&system, &config, false)
            .unwrap()
            .clean()
            .unwrap();

        assert_eq!(report.removed, vec![PathBuf::from("/work/a/__pycache__")]);
    }

    #[test]
    fn dry_run_removes_nothing() {
        let system = workspace()
            .with_dir("/work/dist")
            .unwrap()
            .with_file("/work/pkg/__pycache__/m.pyc", b"")
            .unwrap();
        let config = CleanConfig::default();

        let report = WorkspaceCleaner::in_current_dir(&system, &config, true)
            .unwrap()
            .clean()
            .unwrap();

        assert_eq!(
            report.removed,
            vec![
                PathBuf::from("/work/dist/"),
                PathBuf::from("/work/pkg/__pycache__"),
            ]
        );
        assert!(system.exists(Path::new("/work/dist")));
        assert!(system.exists(Path::new("/work/pkg/__pycache__/m.pyc")));
    }

    #[test]
    fn failures_are_collected_and_cleanup_continues() {
        let system = workspace()
            .with_dir("/work/dist")
            .unwrap()
            .with_failing_removal("/work/dist")
            .unwrap()
            .with_file("/work/pkg/m.pyc", b"")
            .unwrap();
        let config = CleanConfig::default();

        let report = WorkspaceCleaner::in_current_dir(&system, &config, false)
            .unwrap()
            .clean()
            .unwrap();

        assert_eq!(report.removed, vec![PathBuf::from("/work/pkg/m.pyc")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, PathBuf::from("/work/dist/"));

        let err = report.into_result().unwrap_err();
        assert_eq!(err.downcast_ref::<TaskError>().unwrap().exit_code(), 5);
    }
}
