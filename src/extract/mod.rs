//! Specialization extraction.
//!
//! One operation, [`Extractor::extract`], over two interchangeable
//! strategies sharing the [`Extraction`] contract:
//!
//! - [`AstWalk`] runs when the analyzer backend produced a tree. It reads
//!   resolved spellings, so comments and strings are ignored and aliases are
//!   seen through. It also flags file-scope template declarations for
//!   manual naming.
//! - [`TextScan`] runs when there is no backend or it failed on this file.
//!   Best effort: it matches inside comments and string literals too, and
//!   cannot see through aliases or macros.
//!
//! Both normalize through [`crate::spec::find_specs`].

mod ast_walk;
mod text_scan;

use std::collections::BTreeSet;
use std::path::Path;

use crate::parser::{AnalyzerBackend, AnalyzerError, CompileFlags, HeaderAnalyzer, HeaderTree};
use crate::spec::CanonicalSpec;

pub use ast_walk::AstWalk;
pub use text_scan::TextScan;

/// Specs discovered in one header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Every `Matrix<Scalar,Rows,Cols>` referenced.
    pub specs: BTreeSet<CanonicalSpec>,
    /// Keys that need a curated name (file-scope template declarations).
    pub pending: BTreeSet<CanonicalSpec>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty() && self.pending.is_empty()
    }

    /// All keys, pending ones included.
    pub fn keys(&self) -> impl Iterator<Item = &CanonicalSpec> {
        self.specs.union(&self.pending)
    }

    pub fn is_pending(&self, spec: &CanonicalSpec) -> bool {
        self.pending.contains(spec)
    }
}

/// Which strategy produced an [`Extraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    AstWalk,
    TextScan,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AstWalk => "ast-walk",
            Self::TextScan => "text-scan",
        }
    }
}

/// A way of finding specs in one header.
pub trait ExtractionStrategy {
    fn kind(&self) -> StrategyKind;

    fn extract(&self, source: &str) -> Extraction;
}

/// Outcome of extracting one file.
#[derive(Debug)]
pub struct FileExtraction {
    pub extraction: Extraction,
    pub strategy: StrategyKind,
    /// Tree the AST walk ran over, kept for dumping.
    pub tree: Option<HeaderTree>,
    /// Why the analyzer was bypassed, when it failed.
    pub fallback_reason: Option<AnalyzerError>,
}

/// Picks a strategy per file by probing the analyzer backend.
pub struct Extractor {
    backend: Option<Box<dyn AnalyzerBackend>>,
    flags: CompileFlags,
}

impl Extractor {
    pub fn new(backend: Option<Box<dyn AnalyzerBackend>>, flags: CompileFlags) -> Self {
        Self { backend, flags }
    }

    /// Extractor backed by the built-in [`HeaderAnalyzer`].
    pub fn with_header_analyzer(flags: CompileFlags) -> Self {
        Self::new(Some(Box::new(HeaderAnalyzer::new())), flags)
    }

    /// Extractor with no backend; every file is text-scanned.
    pub fn text_only() -> Self {
        Self::new(None, CompileFlags::default())
    }

    pub fn has_analyzer(&self) -> bool {
        self.backend.is_some()
    }

    /// Extract specs from one header. Never fails: analyzer errors fall
    /// back to the text scan for this file only.
    pub fn extract(&self, path: &Path, source: &str) -> FileExtraction {
        let Some(backend) = &self.backend else {
            return Self::scan_text(source, None);
        };

        match backend.parse(path, source, &self.flags) {
            Ok(tree) => {
                let extraction = AstWalk::new(&tree).extract(source);
                FileExtraction {
                    extraction,
                    strategy: StrategyKind::AstWalk,
                    tree: Some(tree),
                    fallback_reason: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    "{}: {} failed ({}), falling back to text scan",
                    path.display(),
                    backend.name(),
                    err
                );
                Self::scan_text(source, Some(err))
            }
        }
    }

    fn scan_text(source: &str, reason: Option<AnalyzerError>) -> FileExtraction {
        FileExtraction {
            extraction: TextScan.extract(source),
            strategy: StrategyKind::TextScan,
            tree: None,
            fallback_reason: reason,
        }
    }
}
