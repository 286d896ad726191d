//! Built-in analyzer backend for C++ headers
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens, trivia dropped (comments, strings, #lines)
//!     ↓
//! HeaderParser → HeaderTree of declaration-level SyntaxNodes
//!     ↓
//! AST-walk extraction (crate::extract)
//! ```
//!
//! Every node carries a resolved spelling: `typedef`/`using` aliases in
//! scope and `-D` macros are substituted. The tree is
//! deliberately shallow; only namespaces, records, templates, aliases and
//! brace bodies get structure.

mod backend;
mod error;
mod header_parser;
mod lexer;
mod tree;

pub use backend::{AnalyzerBackend, CompileFlags, HeaderAnalyzer};
pub use error::AnalyzerError;
pub use header_parser::{HeaderParser, MAX_NESTING};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use tree::{HeaderTree, NodeKind, SyntaxNode};
