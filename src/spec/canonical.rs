use std::fmt;

use smol_str::SmolStr;

use crate::base::constants::MATRIX_TEMPLATE;
use crate::base::text_utils::{collapse_whitespace, strip_qualifiers};

/// Normalized key for a specialization, e.g. `Matrix<double,4,4>`.
///
/// Two spellings are the same spec iff they agree after whitespace removal
/// and namespace-qualifier stripping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalSpec(SmolStr);

impl CanonicalSpec {
    /// Normalize a raw spelling into a canonical key.
    pub fn new(raw: &str) -> Self {
        Self(SmolStr::new(strip_qualifiers(&collapse_whitespace(raw))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key as `Matrix<Scalar,Rows,Cols>`.
    ///
    /// Returns `None` for anything else (template names recorded for
    /// curation, four-argument forms, unbalanced text).
    pub fn shape(&self) -> Option<MatrixShape> {
        let args = self
            .0
            .strip_prefix(MATRIX_TEMPLATE)?
            .strip_prefix('<')?
            .strip_suffix('>')?;

        let parts = split_top_level(args)?;
        let [scalar, rows, cols] = parts.as_slice() else {
            return None;
        };
        if [scalar, rows, cols].iter().any(|p| p.is_empty()) {
            return None;
        }

        Some(MatrixShape {
            scalar: ScalarType::parse(scalar),
            rows: Dim::parse(rows),
            cols: Dim::parse(cols),
        })
    }
}

impl fmt::Display for CanonicalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalSpec {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Split on commas not nested in `<>`/`()`. `None` if brackets don't balance.
fn split_top_level(args: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in args.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            ',' if depth == 0 => {
                parts.push(&args[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    parts.push(&args[start..]);
    Some(parts)
}

/// A parsed `Matrix<Scalar,Rows,Cols>` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixShape {
    pub scalar: ScalarType,
    pub rows: Dim,
    pub cols: Dim,
}

impl MatrixShape {
    /// Both dimensions are integer literals.
    pub fn fixed_size(&self) -> Option<(u64, u64)> {
        match (&self.rows, &self.cols) {
            (Dim::Fixed(r), Dim::Fixed(c)) => Some((*r, *c)),
            _ => None,
        }
    }
}

/// Scalar type of a specialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    Float,
    Double,
    Int,
    Long,
    /// Anything outside the table; named and typed through fallbacks.
    Other(SmolStr),
}

impl ScalarType {
    pub fn parse(text: &str) -> Self {
        match text {
            "float" => Self::Float,
            "double" => Self::Double,
            "int" => Self::Int,
            "long" => Self::Long,
            other => Self::Other(SmolStr::new(other)),
        }
    }

    /// One-letter tag used in derived symbol names.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Float => "f",
            Self::Double => "d",
            Self::Int => "i",
            Self::Long => "l",
            Self::Other(_) => "x",
        }
    }

    /// C element type. Unknown scalars are stored as `double`.
    pub fn c_type(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Int => "int",
            Self::Long => "long",
            Self::Other(_) => "double",
        }
    }

    /// `printf` conversion that prints one element without losing precision.
    pub fn printf_format(&self) -> &'static str {
        match self {
            Self::Float => "%.9g",
            Self::Int => "%d",
            Self::Long => "%ld",
            Self::Double | Self::Other(_) => "%.17g",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// A row or column count as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dim {
    Fixed(u64),
    /// `Eigen::Dynamic`, sized at runtime.
    Dynamic,
    /// Any other expression, kept verbatim (normalized).
    Symbolic(SmolStr),
}

impl Dim {
    pub fn parse(text: &str) -> Self {
        if text == "Dynamic" {
            return Self::Dynamic;
        }
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = text.parse() {
                return Self::Fixed(n);
            }
        }
        Self::Symbolic(SmolStr::new(text))
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Dynamic => f.write_str("Dynamic"),
            Self::Symbolic(expr) => f.write_str(expr),
        }
    }
}
