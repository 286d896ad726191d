//! Text manipulation utilities for type spellings found in headers.

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Remove whitespace from a type spelling.
///
/// A run of whitespace between two word characters collapses to one space
/// (`unsigned   int` stays two words); every other run is dropped
/// (`N + 1` becomes `N+1`).
///
/// # Example
/// ```
/// use porter::base::text_utils::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace(" Matrix < double , 4 ,4 >"), "Matrix<double,4,4>");
/// assert_eq!(collapse_whitespace("unsigned \n int"), "unsigned int");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space
            && is_word_character(c)
            && out.chars().next_back().is_some_and(is_word_character)
        {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Strip namespace qualifiers (`Eigen::`, `std::`, a leading `::`).
///
/// Expects input already passed through [`collapse_whitespace`]. A qualifier
/// that is itself a template-id (`Outer<int>::Inner`) is removed along with
/// its argument list.
///
/// # Example
/// ```
/// use porter::base::text_utils::strip_qualifiers;
///
/// assert_eq!(strip_qualifiers("Eigen::Matrix<std::size_t,2,2>"), "Matrix<size_t,2,2>");
/// assert_eq!(strip_qualifiers("::Matrix"), "Matrix");
/// ```
pub fn strip_qualifiers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            drop_trailing_qualifier(&mut out);
            continue;
        }
        out.push(c);
    }

    out
}

/// Pop the qualifier name (and a trailing template argument list) from `out`.
fn drop_trailing_qualifier(out: &mut String) {
    if out.ends_with('>') {
        let mut depth = 0usize;
        while let Some(c) = out.pop() {
            match c {
                '>' => depth += 1,
                '<' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    while out.chars().next_back().is_some_and(is_word_character) {
        out.pop();
    }
}

/// Turn arbitrary text into a C identifier fragment.
///
/// Non-identifier characters become `_`, runs of `_` collapse and leading or
/// trailing `_` are trimmed. Returns `_` for text without identifier
/// characters.
pub fn sanitize_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_c_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
