//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use porter::project::PorterConfig;
use tempfile::TempDir;

/// A scratch project: `Eigen/` headers, `porter/mapping.yaml`, `out/`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root().join("Eigen")
    }

    pub fn header(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.source_dir().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(&path, text).expect("write header");
        path
    }

    pub fn config(&self) -> PorterConfig {
        PorterConfig {
            source_dir: self.source_dir(),
            mapping_path: self.root().join("porter").join("mapping.yaml"),
            output_path: self.root().join("out").join("ec_generated.h"),
            ..PorterConfig::default()
        }
    }
}

/// The C compiler from `$CC`, or `cc`, if it runs.
pub fn c_compiler() -> Option<String> {
    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
    let probe = Command::new(&cc).arg("--version").output().ok()?;
    probe.status.success().then_some(cc)
}
