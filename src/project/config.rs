//! Run configuration, read from an optional YAML file.
//!
//! ```yaml
//! source_dir: third_party/Eigen
//! mapping_path: porter/mapping.yaml
//! output_path: eigenc/include/ec_generated.h
//! compile_args: ["-std=c++17", "-DEIGEN_DEFAULT_DENSE_INDEX_TYPE=long"]
//! overrides:
//!   "Matrix<double,4,4>": Pose4
//! ```
//!
//! Every field is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::base::constants::{
    DEFAULT_CXX_STANDARD, DEFAULT_INCLUDE_GUARD, DEFAULT_MAPPING_PATH, DEFAULT_OUTPUT_PATH,
    DEFAULT_SOURCE_DIR, DEFAULT_SYMBOL_PREFIX, HEADER_EXTENSIONS,
};
use crate::codegen::CodegenOptions;
use crate::error::{PorterError, Result};
use crate::parser::CompileFlags;
use crate::spec::SymbolNamer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PorterConfig {
    /// Root of the headers to scan.
    pub source_dir: PathBuf,
    pub mapping_path: PathBuf,
    pub output_path: PathBuf,
    /// Header extensions, without the dot.
    pub extensions: Vec<String>,
    /// Flags for the analyzer. `-I<source_dir>` is appended.
    pub compile_args: Vec<String>,
    /// Probe the built-in analyzer before text scanning.
    pub use_analyzer: bool,
    /// Where to write per-header AST dumps, if anywhere.
    pub ast_dump_dir: Option<PathBuf>,
    pub symbol_prefix: String,
    pub include_guard: String,
    /// Curated names; replace whatever the store holds for the key.
    pub overrides: BTreeMap<String, String>,
}

impl Default for PorterConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            extensions: HEADER_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            compile_args: vec![DEFAULT_CXX_STANDARD.to_string()],
            use_analyzer: true,
            ast_dump_dir: None,
            symbol_prefix: DEFAULT_SYMBOL_PREFIX.to_string(),
            include_guard: DEFAULT_INCLUDE_GUARD.to_string(),
            overrides: BTreeMap::new(),
        }
    }
}

impl PorterConfig {
    /// Read a config file. An empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PorterError::read(path, e))?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| PorterError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn compile_flags(&self) -> CompileFlags {
        let mut flags = CompileFlags::new(self.compile_args.iter().cloned());
        flags.push(format!("-I{}", self.source_dir.display()));
        flags
    }

    pub fn namer(&self) -> SymbolNamer {
        SymbolNamer::new(&self.symbol_prefix)
    }

    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            include_guard: self.include_guard.clone(),
        }
    }
}
