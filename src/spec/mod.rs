//! Canonical specializations of the `Matrix<Scalar,Rows,Cols>` shape.
//!
//! ```text
//! raw spelling ──normalize──► CanonicalSpec ──shape()──► MatrixShape
//!                                   │
//!                                   └──SymbolNamer──► SymbolName
//! ```
//!
//! Both extraction strategies go through [`find_specs`] so the same logical
//! specialization always lands on the same key.

mod canonical;
mod namer;
mod pattern;

pub use canonical::{CanonicalSpec, Dim, MatrixShape, ScalarType};
pub use namer::{DerivedName, NameFallback, SymbolName, SymbolNamer};
pub use pattern::find_specs;

#[cfg(test)]
mod tests;
