//! Mock system implementation for testing

use super::{CommandStatus, System, WalkControl, WalkEntry};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and a scripted process
/// table, perfect for fast, isolated unit tests without side effects.
/// Every launched command is recorded and can be inspected afterwards.
///
/// # Example
/// ```
/// use devtask::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_file("/work/pkg/mod.pyc", b"").unwrap()
///     .with_dir("/work/build").unwrap()
///     .with_exit_code("flake8", 1).unwrap();
///
/// assert!(system.exists(Path::new("/work/pkg/mod.pyc")));
/// let status = system.run_command("flake8", &["pkg".to_owned()]).unwrap();
/// assert!(!status.success());
/// assert_eq!(system.invocations(), vec![vec!["flake8".to_owned(), "pkg".to_owned()]]);
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    current_dir: PathBuf,
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    exit_codes: HashMap<String, i32>,
    missing_programs: HashSet<String>,
    failing_removals: BTreeSet<PathBuf>,
    invocations: Vec<Vec<String>>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                current_dir: PathBuf::from("/"),
                files: BTreeMap::new(),
                dirs: BTreeSet::from([PathBuf::from("/")]),
                exit_codes: HashMap::new(),
                missing_programs: HashSet::new(),
                failing_removals: BTreeSet::new(),
                invocations: Vec::new(),
            })),
        }
    }

    /// Set the current working directory (builder pattern)
    ///
    /// The directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &dir);
        state.current_dir = dir;
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &path_buf);
        drop(state);
        Ok(self)
    }

    /// Make every launch of `program` exit with `code` (builder pattern)
    ///
    /// Programs without a scripted code exit with zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_exit_code(self, program: &str, code: i32) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.exit_codes.insert(program.to_owned(), code);
        drop(state);
        Ok(self)
    }

    /// Make `program` fail to spawn, as if it were not installed (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_missing_program(self, program: &str) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.missing_programs.insert(program.to_owned());
        drop(state);
        Ok(self)
    }

    /// Make removal of `path` fail with a permission error (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_failing_removal<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.failing_removals.insert(path.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Every command launched so far, program first
    #[must_use]
    #[inline]
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.state
            .read()
            .map(|state| state.invocations.clone())
            .unwrap_or_default()
    }

    /// Programs launched so far, in launch order
    #[must_use]
    #[inline]
    pub fn programs(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter_map(|invocation| invocation.into_iter().next())
            .collect()
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor == Path::new("") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    #[inline]
    fn check_removal(state: &MockSystemState, path: &Path) -> io::Result<()> {
        if state.failing_removals.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.current_dir.clone())
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }
        Self::check_removal(&state, path)?;

        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        drop(state);
        Ok(())
    }

    #[inline]
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ));
        }
        Self::check_removal(&state, path)?;

        state.files.remove(path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.dirs.contains(path))
    }

    #[inline]
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let entries = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        drop(state);

        Ok(entries)
    }

    #[inline]
    fn walk_dir(
        &self,
        path: &Path,
        visit: &mut dyn FnMut(&WalkEntry) -> WalkControl,
    ) -> io::Result<()> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let mut entries: Vec<WalkEntry> = state
            .dirs
            .iter()
            .filter(|dir| dir.starts_with(path) && dir.as_path() != path)
            .map(|dir| WalkEntry {
                path: dir.clone(),
                is_file: false,
                is_dir: true,
            })
            .chain(
                state
                    .files
                    .keys()
                    .filter(|file| file.starts_with(path))
                    .map(|file| WalkEntry {
                        path: file.clone(),
                        is_file: true,
                        is_dir: false,
                    }),
            )
            .collect();
        drop(state);

        // Component-wise ordering puts every directory before its contents
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        let mut skipped: Vec<PathBuf> = Vec::new();
        for entry in entries {
            if skipped.iter().any(|dir| entry.path.starts_with(dir)) {
                continue;
            }
            if visit(&entry) == WalkControl::SkipSubtree && entry.is_dir {
                skipped.push(entry.path);
            }
        }

        Ok(())
    }

    #[inline]
    fn run_command(&self, program: &str, args: &[String]) -> io::Result<CommandStatus> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        let mut invocation = Vec::with_capacity(args.len() + 1);
        invocation.push(program.to_owned());
        invocation.extend(args.iter().cloned());
        state.invocations.push(invocation);

        if state.missing_programs.contains(program) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No such program: {program}"),
            ));
        }

        let code = state.exit_codes.get(program).copied().unwrap_or(0);
        drop(state);
        Ok(CommandStatus::from_code(code))
    }
}
