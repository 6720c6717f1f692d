//! System abstraction for filesystem and process operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Entry from directory walking
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_file: bool,
    pub is_dir: bool,
}

/// Whether a walk descends into the directory just visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Descend,
    /// Do not visit anything beneath this entry
    SkipSubtree,
}

/// Exit status of a finished external process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    /// Status of a process that exited with `code`
    #[must_use]
    #[inline]
    pub const fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the process exited with code zero
    #[must_use]
    #[inline]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Unified trait for system operations (filesystem + processes)
///
/// This trait abstracts all interactions with the operating system,
/// including filesystem operations and launching external tools.
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs`, `walkdir` and `std::process`
/// - `MockSystem`: Test implementation using in-memory storage and scripted exit codes
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Remove a directory and all its contents
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Read directory entries, returning paths of all immediate children
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Recursively walk a directory, calling `visit` for each entry as it is found
    ///
    /// The root itself is not visited. A directory is visited before its
    /// contents, and `visit` may remove it and return
    /// [`WalkControl::SkipSubtree`] so its contents are never read. Symbolic
    /// links are reported but never followed. Entries that vanish while
    /// walking are skipped.
    fn walk_dir(
        &self,
        path: &Path,
        visit: &mut dyn FnMut(&WalkEntry) -> WalkControl,
    ) -> io::Result<()>;

    // ==================== Process Operations ====================

    /// Launch `program` with `args`, inheriting stdio, and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned at all
    /// (for example, the program is not installed).
    fn run_command(&self, program: &str, args: &[String]) -> io::Result<CommandStatus>;
}
