use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PorterError, Result};

/// Every file under `dir` whose extension is in `extensions`, sorted.
///
/// Extensions are compared case-insensitively and given without the dot.
pub fn collect_header_paths<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PorterError::MissingSourceDir(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| PorterError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.as_ref().eq_ignore_ascii_case(ext))
        })
}
