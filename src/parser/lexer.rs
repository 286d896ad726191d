//! Logos-based lexer for C++ headers
//!
//! Only distinguishes what the declaration parser needs: brackets, a few
//! keywords, identifiers, and trivia (whitespace, comments, string literals,
//! preprocessor lines) that never reaches the tree.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// Token categories seen by the header parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Trivia,
    Ident,
    Number,
    ClassKw,
    StructKw,
    UnionKw,
    EnumKw,
    NamespaceKw,
    TemplateKw,
    TypedefKw,
    UsingKw,
    OperatorKw,
    ReturnKw,
    InlineKw,
    ColonColon,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Semicolon,
    Colon,
    Eq,
    Punct,
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Trivia)
    }

    /// `class`, `struct` or `union`.
    pub fn is_record_keyword(self) -> bool {
        matches!(self, Self::ClassKw | Self::StructKw | Self::UnionKw)
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::new(span.start as u32),
            TextSize::new(span.end as u32),
        );

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, range })
    }
}

/// Tokenize an entire string, dropping trivia.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).filter(|t| !t.kind.is_trivia()).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    /// Whole preprocessor line, including backslash continuations.
    #[regex(r"#([^\n\\]|\\[^\n]|\\\r?\n)*")]
    Preprocessor,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_.']*")]
    Number,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("class")]
    ClassKw,
    #[token("struct")]
    StructKw,
    #[token("union")]
    UnionKw,
    #[token("enum")]
    EnumKw,
    #[token("namespace")]
    NamespaceKw,
    #[token("template")]
    TemplateKw,
    #[token("typedef")]
    TypedefKw,
    #[token("using")]
    UsingKw,
    #[token("operator")]
    OperatorKw,
    #[token("return")]
    ReturnKw,
    #[token("inline")]
    InlineKw,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("::")]
    ColonColon,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[regex(r"[!%&*+\-./?^|~@$\\`]")]
    Punct,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace | LineComment | BlockComment | Preprocessor | String | Char => {
                TokenKind::Trivia
            }
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::Number => TokenKind::Number,
            LogosToken::ClassKw => TokenKind::ClassKw,
            LogosToken::StructKw => TokenKind::StructKw,
            LogosToken::UnionKw => TokenKind::UnionKw,
            LogosToken::EnumKw => TokenKind::EnumKw,
            LogosToken::NamespaceKw => TokenKind::NamespaceKw,
            LogosToken::TemplateKw => TokenKind::TemplateKw,
            LogosToken::TypedefKw => TokenKind::TypedefKw,
            LogosToken::UsingKw => TokenKind::UsingKw,
            LogosToken::OperatorKw => TokenKind::OperatorKw,
            LogosToken::ReturnKw => TokenKind::ReturnKw,
            LogosToken::InlineKw => TokenKind::InlineKw,
            LogosToken::ColonColon => TokenKind::ColonColon,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::LBracket => TokenKind::LBracket,
            LogosToken::RBracket => TokenKind::RBracket,
            LogosToken::Lt => TokenKind::Lt,
            LogosToken::Gt => TokenKind::Gt,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Semicolon => TokenKind::Semicolon,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Eq => TokenKind::Eq,
            LogosToken::Punct => TokenKind::Punct,
        }
    }
}
