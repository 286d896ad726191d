//! # eigenc-porter
//!
//! Ports `Matrix<Scalar,Rows,Cols>` specializations found in C++ headers to
//! plain C value types with add/multiply kernels.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Config, header collection, scan → merge → persist → generate
//!   ↓
//! codegen   → C header: value types, kernels, _Generic dispatch
//!   ↓
//! store     → Spec → name mapping, left-biased merge, YAML persistence
//!   ↓
//! extract   → AST-walk and text-scan strategies behind one Extractor
//!   ↓
//! spec      → CanonicalSpec, MatrixShape, SymbolNamer, shared matcher
//!   ↓
//! parser    → Logos lexer, declaration-level header analyzer
//!   ↓
//! base      → Constants, text helpers, TextRange
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use porter::project::{Porter, PorterConfig};
//!
//! let porter = Porter::new(PorterConfig::default());
//! let (report, unit) = porter.run()?;
//! println!("{} new mappings, {} types", report.added.len(), unit.emitted.len());
//! # Ok::<(), porter::error::PorterError>(())
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → spec → extract → store → codegen → project)
// ============================================================================

/// Constants, text helpers, TextRange
pub mod base;

/// Built-in analyzer backend: lexer, header parser, syntax tree
pub mod parser;

/// Canonical specs, shapes and symbol naming
pub mod spec;

/// Per-file specialization extraction
pub mod extract;

/// Persisted spec → name mapping
pub mod store;

/// C header generation
pub mod codegen;

/// Configuration and the end-to-end pipeline
pub mod project;

/// Crate-level error type
pub mod error;

pub use base::{TextRange, TextSize};
pub use codegen::{CodegenOptions, GeneratedUnit, generate};
pub use error::{PorterError, Result};
pub use extract::{Extraction, Extractor};
pub use project::{Porter, PorterConfig, ScanReport};
pub use spec::{CanonicalSpec, SymbolName, SymbolNamer};
pub use store::{MappingEntry, MappingStore};
