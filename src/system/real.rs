//! Real system implementation using `std::fs`, `walkdir` and `std::process`

use super::{CommandStatus, System, WalkControl, WalkEntry};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;
use walkdir::WalkDir;

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// filesystem and process functions.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        return Self;
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn walk_dir(
        &self,
        path: &Path,
        visit: &mut dyn FnMut(&WalkEntry) -> WalkControl,
    ) -> io::Result<()> {
        let mut walker = WalkDir::new(path).min_depth(1).follow_links(false).into_iter();

        while let Some(entry) = walker.next() {
            match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let entry = WalkEntry {
                        path: entry.into_path(),
                        is_file: file_type.is_file(),
                        is_dir: file_type.is_dir(),
                    };
                    // On a file this would skip the rest of its parent
                    if visit(&entry) == WalkControl::SkipSubtree && entry.is_dir {
                        walker.skip_current_dir();
                    }
                }
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
                    {
                        continue;
                    }
                    let location = err
                        .path()
                        .map_or_else(|| path.display().to_string(), |p| p.display().to_string());
                    warn!("Skipping unreadable entry {}: {}", location, err);
                }
            }
        }

        Ok(())
    }

    fn run_command(&self, program: &str, args: &[String]) -> io::Result<CommandStatus> {
        let status = Command::new(program).args(args).status()?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}
