//! File system utilities

use crate::system::System;
use std::io;
use std::path::Path;

/// Outcome of removing a single filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The entry existed and is gone now
    Removed,
    /// Nothing was there to remove
    Absent,
}

/// Remove a directory tree or a single file, whichever `path` is
///
/// A path that does not exist, or vanishes before it can be removed,
/// yields `Removal::Absent` instead of an error.
///
/// # Errors
///
/// Returns the underlying I/O error for any other removal failure
/// (for example, permission denied).
pub fn remove_entry(system: &dyn System, path: &Path) -> io::Result<Removal> {
    let result = if system.is_dir(path) {
        system.remove_dir_all(path)
    } else if system.is_file(path) {
        system.remove_file(path)
    } else {
        return Ok(Removal::Absent);
    };

    match result {
        Ok(()) => Ok(Removal::Removed),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Removal::Absent),
        Err(err) => Err(err),
    }
}

/// Check whether a file name ends with `suffix`
///
/// Non UTF-8 names never match.
#[must_use]
pub fn name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}

/// Check whether a file name equals `name` exactly
#[must_use]
pub fn name_equals(path: &Path, name: &str) -> bool {
    path.file_name().is_some_and(|file_name| file_name == name)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn test_remove_entry_directory() {
        let system = MockSystem::new()
            .with_file("/w/build/lib/mod.so", b"")
            .unwrap();

        let outcome = remove_entry(&system, Path::new("/w/build")).unwrap();
        assert_eq!(outcome, Removal::Removed);
        assert!(!system.exists(Path::new("/w/build")));
    }

    #[test]
    fn test_remove_entry_file() {
        let system = MockSystem::new().with_file("/w/.coverage", b"data").unwrap();

        let outcome = remove_entry(&system, Path::new("/w/.coverage")).unwrap();
        assert_eq!(outcome, Removal::Removed);
        assert!(!system.exists(Path::new("/w/.coverage")));
    }

    #[test]
    fn test_remove_entry_absent() {
        let system = MockSystem::new();
        let outcome = remove_entry(&system, Path::new("/w/dist")).unwrap();
        assert_eq!(outcome, Removal::Absent);
    }

    #[test]
    fn test_remove_entry_permission_denied() {
        let system = MockSystem::new()
            .with_dir("/w/dist")
            .unwrap()
            .with_failing_removal("/w/dist")
            .unwrap();

        let err = remove_entry(&system, Path::new("/w/dist")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_name_matching() {
        assert!(name_ends_with(Path::new("pkg/mod.cpython-311.pyc"), ".pyc"));
        assert!(!name_ends_with(Path::new("pkg/mod.py"), ".pyc"));
        assert!(name_equals(Path::new("a/b/__pycache__"), "__pycache__"));
        assert!(!name_equals(Path::new("a/__pycache__x"), "__pycache__"));
    }
}
