//! C header generation from a [`MappingStore`].
//!
//! ## Output layout
//!
//! ```text
//! guard + includes + EC_REQUIRE
//! per entry (sorted by key):
//!     typedef struct T { size_t rows; size_t cols; S *data; } T;
//!     T_view    (literal shapes only)
//!     T_add, T_mul, T_write
//! ec_add / ec_mul  (_Generic dispatch, omitted when nothing was emitted)
//! #endif
//! ```
//!
//! Generation is pure: the same store always yields the same text.

mod c_header;

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::constants::DEFAULT_INCLUDE_GUARD;
use crate::base::text_utils::is_c_identifier;
use crate::spec::{CanonicalSpec, MatrixShape, SymbolName};
use crate::store::{Binding, MappingStore};

use c_header::{KERNELS, RESERVED_NAMES};

pub use c_header::HeaderWriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Macro guarding the unit against double inclusion.
    pub include_guard: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            include_guard: DEFAULT_INCLUDE_GUARD.to_string(),
        }
    }
}

/// Why an entry produced no C code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Still waiting for a curated name.
    Pending,
    /// Key is not a `Matrix<Scalar,Rows,Cols>` spelling.
    NotAMatrix,
    /// Name is not a usable C identifier, or is a keyword or a name the
    /// generated header already uses.
    InvalidSymbol,
    /// Name already emitted for the given key.
    DuplicateSymbol(CanonicalSpec),
    /// Name equals a kernel generated for the given key (`Foo_add`).
    KernelClash(CanonicalSpec),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending a curated name"),
            Self::NotAMatrix => f.write_str("not a matrix specialization"),
            Self::InvalidSymbol => f.write_str("not a valid C identifier"),
            Self::DuplicateSymbol(owner) => write!(f, "name already used by {owner}"),
            Self::KernelClash(owner) => write!(f, "name clashes with a kernel of {owner}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub spec: CanonicalSpec,
    pub reason: SkipReason,
}

/// One value type to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixType {
    pub spec: CanonicalSpec,
    pub symbol: SymbolName,
    pub shape: MatrixShape,
}

/// A generated header and what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub text: String,
    /// Emitted type names, in output order.
    pub emitted: Vec<SymbolName>,
    pub skipped: Vec<SkippedEntry>,
}

/// Pick the emittable entries of `store`, in key order.
pub fn plan(store: &MappingStore) -> (Vec<MatrixType>, Vec<SkippedEntry>) {
    let mut owners: IndexMap<SymbolName, MatrixType> = IndexMap::new();
    let mut skipped = Vec::new();

    let mut kernels: FxHashMap<String, &CanonicalSpec> = FxHashMap::default();
    for (spec, entry) in store.iter() {
        let Binding::Named(symbol) = &entry.binding else {
            continue;
        };
        if spec.shape().is_none() || !is_usable_name(symbol.as_str()) {
            continue;
        }
        for kernel in KERNELS {
            kernels.entry(format!("{symbol}_{kernel}")).or_insert(spec);
        }
    }

    for (spec, entry) in store.iter() {
        let skip = |reason| SkippedEntry {
            spec: spec.clone(),
            reason,
        };

        let symbol = match &entry.binding {
            Binding::Pending => {
                skipped.push(skip(SkipReason::Pending));
                continue;
            }
            Binding::Named(symbol) => symbol,
        };

        let Some(shape) = spec.shape() else {
            skipped.push(skip(SkipReason::NotAMatrix));
            continue;
        };

        let name = symbol.as_str();
        if !is_usable_name(name) {
            skipped.push(skip(SkipReason::InvalidSymbol));
            continue;
        }

        if let Some(owner) = kernels.get(name) {
            skipped.push(skip(SkipReason::KernelClash((*owner).clone())));
            continue;
        }

        if let Some(owner) = owners.get(symbol) {
            skipped.push(skip(SkipReason::DuplicateSymbol(owner.spec.clone())));
            continue;
        }

        owners.insert(
            symbol.clone(),
            MatrixType {
                spec: spec.clone(),
                symbol: symbol.clone(),
                shape,
            },
        );
    }

    (owners.into_values().collect(), skipped)
}

fn is_usable_name(name: &str) -> bool {
    is_c_identifier(name) && !RESERVED_NAMES.contains(&name)
}

/// Render the C header for every emittable entry of `store`.
pub fn generate(store: &MappingStore, options: &CodegenOptions) -> GeneratedUnit {
    let (types, skipped) = plan(store);

    for entry in &skipped {
        match entry.reason {
            SkipReason::Pending => tracing::debug!("Skipping {}: {}", entry.spec, entry.reason),
            _ => tracing::warn!("Skipping {}: {}", entry.spec, entry.reason),
        }
    }

    let mut writer = HeaderWriter::new(options);
    writer.write_unit(&types);

    tracing::info!(
        "Generated {} type(s), skipped {}",
        types.len(),
        skipped.len()
    );

    GeneratedUnit {
        text: writer.finish(),
        emitted: types.into_iter().map(|ty| ty.symbol).collect(),
        skipped,
    }
}
