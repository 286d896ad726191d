use std::sync::LazyLock;

use regex::Regex;

use super::CanonicalSpec;

/// `Matrix<a,b,c>` with three arguments free of nested brackets.
static MATRIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bMatrix\s*<\s*([^,<>;{}]+?)\s*,\s*([^,<>;{}]+?)\s*,\s*([^,<>;{}]+?)\s*>",
    )
    .expect("matrix pattern is valid")
});

/// Find every `Matrix<Scalar,Rows,Cols>` occurrence in `text`, normalized.
///
/// Shared by the AST walk (applied to resolved type spellings) and the text
/// scan (applied to raw source), which is what keeps their keys comparable.
pub fn find_specs(text: &str) -> impl Iterator<Item = CanonicalSpec> + '_ {
    MATRIX_PATTERN
        .find_iter(text)
        .map(|m| CanonicalSpec::new(m.as_str()))
}
