use std::fmt;

use smol_str::SmolStr;
use xxhash_rust::xxh64::xxh64;

use super::{CanonicalSpec, Dim, ScalarType};
use crate::base::constants::{DEFAULT_SYMBOL_PREFIX, GENERIC_SYMBOL_PREFIX};
use crate::base::text_utils::{is_c_identifier, sanitize_identifier};

/// Generated C identifier for a specialization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolName(SmolStr);

impl SymbolName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymbolName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Why a derived name is less descriptive than usual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFallback {
    /// Scalar type outside the tag table; tagged `x_<scalar>`.
    UnknownScalar(SmolStr),
    /// Key is not a `Matrix<Scalar,Rows,Cols>` spelling.
    NotAMatrix,
}

/// Result of naming a spec. Never an error: odd input gets a tagged fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    pub symbol: SymbolName,
    pub fallback: Option<NameFallback>,
}

/// Deterministic `CanonicalSpec -> SymbolName` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolNamer {
    prefix: SmolStr,
}

impl SymbolNamer {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: SmolStr::new(prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name a spec: `EC_Matrix4d` for `Matrix<double,4,4>`,
    /// `EC_Matrix3x1f` for `Matrix<float,3,1>`, `EC_MatrixXd` for a
    /// dynamic square double matrix.
    ///
    /// Unknown scalars keep their spelling (`EC_Matrix3x_RealScalar`).
    /// When the readable form loses information (symbolic dimensions, a
    /// scalar or key that is not a plain identifier) a short hash of the
    /// key is appended, so distinct keys never share a name.
    pub fn name(&self, spec: &CanonicalSpec) -> DerivedName {
        let Some(shape) = spec.shape() else {
            let mut symbol = format!(
                "{GENERIC_SYMBOL_PREFIX}{}",
                sanitize_identifier(spec.as_str())
            );
            if !is_c_identifier(spec.as_str()) {
                push_key_hash(&mut symbol, spec);
            }
            return DerivedName {
                symbol: SymbolName::new(symbol),
                fallback: Some(NameFallback::NotAMatrix),
            };
        };

        let rows = dim_fragment(&shape.rows);
        let dims = if shape.rows == shape.cols {
            rows
        } else {
            format!("{rows}x{}", dim_fragment(&shape.cols))
        };

        let mut symbol = format!("{}{dims}{}", self.prefix, shape.scalar.tag());
        let mut lossy = [&shape.rows, &shape.cols]
            .into_iter()
            .any(|dim| matches!(dim, Dim::Symbolic(_)));

        let fallback = match &shape.scalar {
            ScalarType::Other(name) => {
                symbol.push('_');
                if is_c_identifier(name) {
                    symbol.push_str(name);
                } else {
                    symbol.push_str(&sanitize_identifier(name));
                    lossy = true;
                }
                Some(NameFallback::UnknownScalar(name.clone()))
            }
            _ => None,
        };

        if lossy {
            push_key_hash(&mut symbol, spec);
        }

        DerivedName {
            symbol: SymbolName::new(symbol),
            fallback,
        }
    }

    /// Shorthand for [`SymbolNamer::name`] when the fallback tag is not needed.
    pub fn symbol(&self, spec: &CanonicalSpec) -> SymbolName {
        self.name(spec).symbol
    }
}

impl Default for SymbolNamer {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL_PREFIX)
    }
}

fn dim_fragment(dim: &Dim) -> String {
    match dim {
        Dim::Fixed(n) => n.to_string(),
        Dim::Dynamic => "X".to_string(),
        Dim::Symbolic(expr) => {
            let spelled: String = expr
                .chars()
                .map(|c| match c {
                    '+' => 'p',
                    '-' => 'm',
                    '*' => 't',
                    '/' => 'd',
                    _ => c,
                })
                .collect();
            sanitize_identifier(&spelled)
        }
    }
}

/// Append `_<8 hex digits>` derived from the canonical key.
fn push_key_hash(symbol: &mut String, spec: &CanonicalSpec) {
    let hash = xxh64(spec.as_str().as_bytes(), 0) as u32;
    symbol.push_str(&format!("_{hash:08x}"));
}
