//! The analyzer boundary: "parse header text with compile flags → tree".

use std::path::Path;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::error::AnalyzerError;
use super::header_parser::HeaderParser;
use super::tree::HeaderTree;

/// Compiler-style flags handed to the analyzer (`-std=c++17`, `-I...`, `-D...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileFlags {
    args: Vec<String>,
}

impl CompileFlags {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    /// Value of the last `-std=` flag.
    pub fn language_standard(&self) -> Option<&str> {
        self.args
            .iter()
            .rev()
            .find_map(|arg| arg.strip_prefix("-std="))
    }

    /// Object-like macros from `-DNAME=VALUE`, `-D NAME=VALUE` and `-DNAME`
    /// (which defines `NAME` as `1`). Function-like macros are ignored.
    pub fn defines(&self) -> FxHashMap<SmolStr, String> {
        let mut defines = FxHashMap::default();
        let mut args = self.args.iter();

        while let Some(arg) = args.next() {
            let definition = match arg.strip_prefix("-D") {
                Some("") => match args.next() {
                    Some(next) => next.as_str(),
                    None => break,
                },
                Some(rest) => rest,
                None => continue,
            };

            let (name, value) = definition.split_once('=').unwrap_or((definition, "1"));
            if name.is_empty() || name.contains('(') {
                continue;
            }
            defines.insert(SmolStr::new(name), value.to_string());
        }

        defines
    }
}

/// A native parser able to build a [`HeaderTree`] for one header.
///
/// Failure is never fatal to a run; callers fall back to text scanning.
pub trait AnalyzerBackend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn parse(
        &self,
        path: &Path,
        source: &str,
        flags: &CompileFlags,
    ) -> Result<HeaderTree, AnalyzerError>;
}

/// Built-in declaration-level analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderAnalyzer;

impl HeaderAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl AnalyzerBackend for HeaderAnalyzer {
    fn name(&self) -> &'static str {
        "header-analyzer"
    }

    fn parse(
        &self,
        path: &Path,
        source: &str,
        flags: &CompileFlags,
    ) -> Result<HeaderTree, AnalyzerError> {
        if let Some(std) = flags.language_standard() {
            if !(std.starts_with("c++") || std.starts_with("gnu++")) {
                return Err(AnalyzerError::UnsupportedFlag(format!("-std={std}")));
            }
        }

        tracing::trace!("Analyzing {}", path.display());
        HeaderParser::new(source, flags.defines()).parse()
    }
}
