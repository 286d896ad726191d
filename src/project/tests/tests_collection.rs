#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::error::PorterError;
use crate::project::collect_header_paths;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

#[test]
fn test_collects_sorted_matching_files() {
    let dir = TempDir::new().expect("temp dir");
    touch(dir.path(), "src/Core/Matrix.h");
    touch(dir.path(), "src/Core/Dot.hpp");
    touch(dir.path(), "src/Core/notes.txt");
    touch(dir.path(), "Dense.H");
    touch(dir.path(), "README");

    let paths = collect_header_paths(dir.path(), &["h", "hpp"]).unwrap();
    let relative: Vec<_> = paths
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(relative, ["Dense.H", "src/Core/Dot.hpp", "src/Core/Matrix.h"]);
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().expect("temp dir");
    let paths = collect_header_paths(dir.path(), &["h"]).unwrap();
    assert!(paths.is_empty());
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope");
    let err = collect_header_paths(&missing, &["h"]).unwrap_err();
    assert!(matches!(err, PorterError::MissingSourceDir(path) if path == missing));
}
