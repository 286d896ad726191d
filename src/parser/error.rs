//! Error types for the header analyzer.

use thiserror::Error;

/// Why the analyzer could not produce a tree for a header.
///
/// None of these are fatal to a run: the extractor falls back to scanning
/// the raw text of that one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzerError {
    /// Input ended inside a `{ ... }` group.
    #[error("unexpected end of input inside block opened at byte {offset}")]
    UnexpectedEof { offset: u32 },

    /// A `}` with no matching `{`.
    #[error("unbalanced `}}` at byte {offset}")]
    UnbalancedBrace { offset: u32 },

    /// `template<` never closed before a `;` or brace.
    #[error("unterminated template parameter list at byte {offset}")]
    UnterminatedTemplateHead { offset: u32 },

    /// Nesting exceeded the parser's limit.
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Compile flag the analyzer cannot honor.
    #[error("unsupported compile flag: {0}")]
    UnsupportedFlag(String),

    /// Backend could not run at all.
    #[error("analyzer unavailable: {0}")]
    Unavailable(String),
}
