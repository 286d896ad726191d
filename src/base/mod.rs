//! Foundation types for the porter.
//!
//! - Domain constants (template name, placeholder, default paths)
//! - Text helpers used by spec normalization and symbol naming
//!
//! This module has NO dependencies on other porter modules.

pub mod constants;
pub mod text_utils;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
