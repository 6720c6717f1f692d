//! Workspace cleanup tests on the real filesystem

use devtask::config::CleanConfig;
use devtask::operations::{WorkspaceCleaner, suffix_artifact_paths};
use devtask::system::RealSystem;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn clean(root: &Path) -> devtask::operations::CleanReport {
    let system = RealSystem::new();
    let config = CleanConfig::default();
    WorkspaceCleaner::new(&system, &config, root.to_path_buf(), false)
        .clean()
        .unwrap()
}

#[test]
fn test_nested_cache_dir_removed_once() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let cache = root.join("stonkwise/strategies/momentum/__pycache__");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("signal.cpython-311.pyc"), b"\x00").unwrap();
    fs::write(root.join("stonkwise/strategies/momentum/signal.py"), b"").unwrap();

    let first = clean(root);
    assert_eq!(first.removed, vec![cache.clone()]);
    assert!(!cache.exists());
    assert!(root.join("stonkwise/strategies/momentum/signal.py").exists());

    let second = clean(root);
    assert!(second.removed.is_empty());
    assert!(second.failed.is_empty());
}

#[test]
fn test_no_artifacts_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("README.md"), b"hello").unwrap();

    let report = clean(temp_dir.path());
    assert!(report.removed.is_empty());
    assert!(report.failed.is_empty());
    assert!(temp_dir.path().join("README.md").exists());
}

#[test]
fn test_artifacts_and_bytecode_removed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("build/lib")).unwrap();
    fs::create_dir_all(root.join("dist")).unwrap();
    fs::create_dir_all(root.join(".pytest_cache/v")).unwrap();
    fs::write(root.join(".coverage"), b"").unwrap();
    fs::create_dir_all(root.join("stonkwise.egg-info")).unwrap();
    fs::create_dir_all(root.join("tests")).unwrap();
    fs::write(root.join("tests/old.pyc"), b"").unwrap();
    fs::write(root.join("tests/test_core.py"), b"").unwrap();

    let report = clean(root);

    assert_eq!(report.removed.len(), 6);
    for gone in ["build", "dist", ".pytest_cache", ".coverage", "stonkwise.egg-info"] {
        assert!(!root.join(gone).exists(), "{gone} should be removed");
    }
    assert!(!root.join("tests/old.pyc").exists());
    assert!(root.join("tests/test_core.py").exists());
}

#[test]
fn test_egg_info_file_is_not_an_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("notes.egg-info"), b"").unwrap();
    fs::create_dir_all(root.join("pkg.egg-info")).unwrap();

    let system = RealSystem::new();
    let paths = suffix_artifact_paths(&system, root, ".egg-info").unwrap();
    assert_eq!(paths, vec![root.join("pkg.egg-info")]);
}

#[test]
fn test_dry_run_leaves_tree_intact() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("dist")).unwrap();
    fs::create_dir_all(root.join("pkg/__pycache__")).unwrap();

    let system = RealSystem::new();
    let config = CleanConfig::default();
    let report = WorkspaceCleaner::new(&system, &config, root.to_path_buf(), true)
        .clean()
        .unwrap();

    assert_eq!(report.removed.len(), 2);
    assert!(root.join("dist").exists());
    assert!(root.join("pkg/__pycache__").exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_not_followed() {
    let outside = TempDir::new().unwrap();
    fs::create_dir_all(outside.path().join("__pycache__")).unwrap();
    fs::write(outside.path().join("keep.pyc"), b"").unwrap();

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::os::unix::fs::symlink(outside.path(), root.join("linked")).unwrap();

    let report = clean(root);

    assert!(report.removed.is_empty());
    assert!(outside.path().join("__pycache__").exists());
    assert!(outside.path().join("keep.pyc").exists());
}
