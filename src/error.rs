//! Crate-level error type.
//!
//! Only filesystem-level problems surface here. Analyzer failures, odd
//! spellings and unknown scalars degrade locally and never reach this type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PorterError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid mapping document {}: {message}", path.display())]
    InvalidMapping { path: PathBuf, message: String },

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("source directory not found: {}", .0.display())]
    MissingSourceDir(PathBuf),
}

impl PorterError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_mapping(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidMapping {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = PorterError> = std::result::Result<T, E>;
