//! Recursive-descent declaration parser for C++ headers.
//!
//! This is not a C++ front end. It recognizes namespaces, records,
//! templates and aliases, and treats everything else as an opaque
//! declaration whose token text becomes the node's spelling. Aliases seen
//! earlier are substituted into later spellings.
//!
//! Alias scoping:
//! - namespace-level aliases live for the rest of the file and also resolve
//!   through namespace qualifiers (`Eigen::Matrix4d`)
//! - record and block bodies open a scope that is dropped at their `}`
//! - template parameters shadow every alias inside their declaration
//! - an alias with a dependent target (`typename traits<D>::Scalar`) also
//!   shadows, so its name is spelled as written

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::error::AnalyzerError;
use super::lexer::{Token, TokenKind, tokenize};
use super::tree::{HeaderTree, NodeKind, SyntaxNode};
use crate::base::text_utils::collapse_whitespace;

/// Maximum brace nesting before the parser gives up.
pub const MAX_NESTING: usize = 256;

/// What the `template<...>` heads in front of a declaration looked like.
#[derive(Debug, Clone, Copy, Default)]
struct TemplateHead {
    /// At least one non-empty parameter list.
    has_params: bool,
}

/// Aliases declared in one record, block or template head. `None` shadows
/// outer aliases of the same name.
type AliasScope = FxHashMap<SmolStr, Option<String>>;

pub struct HeaderParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    macros: FxHashMap<SmolStr, String>,
    file_aliases: FxHashMap<SmolStr, String>,
    scopes: Vec<AliasScope>,
    namespaces: FxHashSet<SmolStr>,
    depth: usize,
    end: TextSize,
}

impl<'a> HeaderParser<'a> {
    /// `predefined` holds object-like macros from the command line; they
    /// are substituted everywhere, ahead of any alias.
    pub fn new(source: &'a str, predefined: FxHashMap<SmolStr, String>) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
            macros: predefined,
            file_aliases: FxHashMap::default(),
            scopes: Vec::new(),
            namespaces: FxHashSet::default(),
            depth: 0,
            end: TextSize::of(source),
        }
    }

    pub fn parse(mut self) -> Result<HeaderTree, AnalyzerError> {
        let children = self.parse_items(false)?;
        let mut root = SyntaxNode::new(NodeKind::TranslationUnit, TextRange::up_to(self.end));
        root.children = children;
        Ok(HeaderTree::new(root))
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    fn parse_items(&mut self, braced: bool) -> Result<Vec<SyntaxNode>, AnalyzerError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(AnalyzerError::NestingTooDeep { limit: MAX_NESTING });
        }

        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                None if braced => {
                    return Err(AnalyzerError::UnexpectedEof {
                        offset: self.end.into(),
                    });
                }
                None => break,
                Some(TokenKind::RBrace) if braced => {
                    self.pos += 1;
                    break;
                }
                Some(TokenKind::RBrace) => {
                    return Err(AnalyzerError::UnbalancedBrace {
                        offset: self.offset().into(),
                    });
                }
                Some(TokenKind::Semicolon) => self.pos += 1,
                Some(_) => items.push(self.parse_item()?),
            }
        }

        self.depth -= 1;
        Ok(items)
    }

    fn parse_item(&mut self) -> Result<SyntaxNode, AnalyzerError> {
        let start = self.pos;
        match self.peek_kind() {
            Some(TokenKind::NamespaceKw) => self.parse_namespace(start),
            Some(TokenKind::InlineKw) if self.nth_kind(1) == Some(TokenKind::NamespaceKw) => {
                self.pos += 1;
                self.parse_namespace(start)
            }
            Some(TokenKind::TemplateKw) => self.parse_template(start),
            Some(TokenKind::TypedefKw) => self.parse_typedef(start),
            Some(TokenKind::UsingKw) => self.parse_using(start, false),
            Some(kind) if kind.is_record_keyword() => self.parse_record(start, None),
            _ => Ok(self.parse_declaration(start, start)?.0),
        }
    }

    fn parse_namespace(&mut self, start: usize) -> Result<SyntaxNode, AnalyzerError> {
        self.pos += 1;
        let name_start = self.pos;
        while matches!(
            self.peek_kind(),
            Some(TokenKind::Ident | TokenKind::ColonColon | TokenKind::InlineKw)
        ) {
            self.pos += 1;
        }

        if self.peek_kind() != Some(TokenKind::LBrace) {
            // Namespace alias or something we don't model.
            self.pos = start;
            return Ok(self.parse_declaration(start, start)?.0);
        }

        let name = self.raw_text(name_start, self.pos);
        for token in &self.tokens[name_start..self.pos] {
            if token.kind == TokenKind::Ident {
                self.namespaces.insert(SmolStr::new(token.text));
            }
        }
        self.pos += 1;
        let children = self.parse_items(true)?;

        let mut node = SyntaxNode::new(NodeKind::Namespace, self.range_from(start));
        node.name = (!name.is_empty()).then(|| SmolStr::new(name));
        node.children = children;
        Ok(node)
    }

    fn parse_template(&mut self, start: usize) -> Result<SyntaxNode, AnalyzerError> {
        let mut head = TemplateHead::default();
        let mut params = AliasScope::default();

        while self.peek_kind() == Some(TokenKind::TemplateKw) {
            self.pos += 1;
            if self.peek_kind() != Some(TokenKind::Lt) {
                // Explicit instantiation: `template class Foo<int>;`
                return Ok(self.parse_declaration(start, self.pos)?.0);
            }
            let params_start = self.pos;
            self.skip_angles()?;
            if self.pos - params_start > 2 {
                head.has_params = true;
            }
            for name in self.template_params(params_start + 1, self.pos - 1) {
                params.insert(name, None);
            }
        }

        self.scopes.push(params);
        let node = self.parse_templated(start, head);
        self.scopes.pop();
        node
    }

    fn parse_templated(
        &mut self,
        start: usize,
        head: TemplateHead,
    ) -> Result<SyntaxNode, AnalyzerError> {
        match self.peek_kind() {
            Some(kind) if kind.is_record_keyword() => self.parse_record(start, Some(head)),
            Some(TokenKind::UsingKw) => self.parse_using(start, true),
            _ => {
                let head_start = self.pos;
                let (mut node, fn_name) = self.parse_declaration(start, head_start)?;
                if let Some(name) = fn_name {
                    node.kind = NodeKind::FunctionTemplate;
                    node.name = Some(name);
                }
                Ok(node)
            }
        }
    }

    fn parse_record(
        &mut self,
        start: usize,
        template: Option<TemplateHead>,
    ) -> Result<SyntaxNode, AnalyzerError> {
        let name_start = self.pos + 1;
        while let Some(kind) = self.peek_kind() {
            if matches!(
                kind,
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace
            ) {
                break;
            }
            self.pos += 1;
        }
        let head_end = self.pos;
        let (name, has_args) = self.record_name(name_start, head_end);

        let kind = match template {
            None => NodeKind::Record,
            Some(head) if head.has_params && has_args => NodeKind::ClassTemplatePartial,
            Some(_) => NodeKind::ClassTemplate,
        };

        let mut spelling = self.spell(start, head_end);
        let mut children = Vec::new();

        match self.peek_kind() {
            Some(TokenKind::LBrace) => {
                self.pos += 1;
                children = self.parse_scoped_items()?;

                // Trailing declarators: `struct { ... } a, b;`
                let trailing_start = self.pos;
                while let Some(kind) = self.peek_kind() {
                    if matches!(kind, TokenKind::Semicolon | TokenKind::RBrace) {
                        break;
                    }
                    if kind == TokenKind::LBrace {
                        self.skip_braces()?;
                        continue;
                    }
                    self.pos += 1;
                }
                let trailing = self.spell(trailing_start, self.pos);
                if !trailing.is_empty() {
                    spelling.push(' ');
                    spelling.push_str(&trailing);
                }
                self.eat(TokenKind::Semicolon);
            }
            Some(TokenKind::Semicolon) => self.pos += 1,
            _ => {}
        }

        let mut node = SyntaxNode::new(kind, self.range_from(start));
        node.name = name;
        node.spelling = spelling;
        node.children = children;
        Ok(node)
    }

    fn parse_typedef(&mut self, start: usize) -> Result<SyntaxNode, AnalyzerError> {
        self.pos += 1;
        let body_start = self.pos;
        let body_end = self.collect_statement()?;

        let spelling = self.spell(start, body_end);
        let name = self.simple_declarator(body_start, body_end);
        if let Some(name) = &name {
            self.define_alias(name.clone(), body_start, body_end - 1);
        }

        let mut node = SyntaxNode::new(NodeKind::TypeAlias, self.range_from(start));
        node.name = name;
        node.spelling = spelling;
        Ok(node)
    }

    fn parse_using(&mut self, start: usize, templated: bool) -> Result<SyntaxNode, AnalyzerError> {
        self.pos += 1;
        let is_alias = self.peek_kind() == Some(TokenKind::Ident)
            && self.nth_kind(1) == Some(TokenKind::Eq);

        if !is_alias {
            // `using namespace X;` / `using Base::member;`
            let end = self.collect_statement()?;
            let mut node = SyntaxNode::new(NodeKind::Declaration, self.range_from(start));
            node.spelling = self.spell(start, end);
            return Ok(node);
        }

        let name = SmolStr::new(self.tokens[self.pos].text);
        self.pos += 2;
        let target_start = self.pos;
        let end = self.collect_statement()?;

        let spelling = self.spell(start, end);
        if !templated {
            self.define_alias(name.clone(), target_start, end);
        }

        let mut node = SyntaxNode::new(NodeKind::TypeAlias, self.range_from(start));
        node.name = Some(name);
        node.spelling = spelling;
        Ok(node)
    }

    /// Parse an opaque declaration or statement.
    ///
    /// Returns the node plus, when the head looks like a function
    /// declarator, the function's name (searched from `head_start`).
    fn parse_declaration(
        &mut self,
        start: usize,
        head_start: usize,
    ) -> Result<(SyntaxNode, Option<SmolStr>), AnalyzerError> {
        let mut paren_depth = 0usize;
        let mut seen_eq = self.tokens.get(start).map(|t| t.kind) == Some(TokenKind::ReturnKw);
        let mut first_paren = None;
        let mut body = None;
        let mut end;

        loop {
            end = self.pos;
            match self.peek_kind() {
                None => break,
                Some(TokenKind::Semicolon) if paren_depth == 0 => {
                    self.pos += 1;
                    break;
                }
                Some(TokenKind::RBrace) => break,
                Some(TokenKind::LParen) => {
                    if paren_depth == 0 && first_paren.is_none() && !seen_eq {
                        first_paren = Some(self.pos);
                    }
                    paren_depth += 1;
                    self.pos += 1;
                }
                Some(TokenKind::LBracket) => {
                    paren_depth += 1;
                    self.pos += 1;
                }
                Some(TokenKind::RParen | TokenKind::RBracket) => {
                    paren_depth = paren_depth.saturating_sub(1);
                    self.pos += 1;
                }
                Some(TokenKind::Eq) if paren_depth == 0 => {
                    if self.prev_kind() != Some(TokenKind::OperatorKw) {
                        seen_eq = true;
                    }
                    self.pos += 1;
                }
                Some(TokenKind::LBrace) if seen_eq || paren_depth > 0 => {
                    // Initializer list or lambda body.
                    self.skip_braces()?;
                }
                Some(TokenKind::LBrace) => {
                    let block_start = self.pos;
                    self.pos += 1;
                    // `extern "C" { ... }` opens no scope.
                    let linkage =
                        block_start == start + 1 && self.tokens[start].text == "extern";
                    let children = if linkage {
                        self.parse_items(true)?
                    } else {
                        self.parse_scoped_items()?
                    };
                    let mut block = SyntaxNode::new(NodeKind::Block, self.range_from(block_start));
                    block.children = children;
                    body = Some(block);
                    self.eat(TokenKind::Semicolon);
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }

        let fn_name = first_paren.and_then(|paren| self.function_name(head_start, paren));

        let mut node = SyntaxNode::new(NodeKind::Declaration, self.range_from(start));
        node.spelling = self.spell(start, end);
        node.children.extend(body);
        Ok((node, fn_name))
    }

    // =========================================================================
    // NAMES
    // =========================================================================

    /// Name of a record from its head, plus whether it carries template
    /// arguments (a specialization).
    fn record_name(&self, from: usize, to: usize) -> (Option<SmolStr>, bool) {
        let mut angle = 0usize;
        let mut paren = 0usize;
        let mut ident = None;
        let mut args_end = None;

        for idx in from..to {
            let token = &self.tokens[idx];
            match token.kind {
                TokenKind::LParen => paren += 1,
                TokenKind::RParen => paren = paren.saturating_sub(1),
                _ if paren > 0 => {}
                TokenKind::Lt => angle += 1,
                TokenKind::Gt => {
                    angle = angle.saturating_sub(1);
                    if angle == 0 && ident.is_some() {
                        args_end = Some(idx);
                    }
                }
                TokenKind::Colon if angle == 0 => break,
                TokenKind::Ident if angle == 0 && token.text != "final" => {
                    ident = Some(idx);
                    args_end = None;
                }
                _ => {}
            }
        }

        let Some(ident) = ident else {
            return (None, false);
        };
        match args_end {
            Some(end) => (
                Some(SmolStr::new(collapse_whitespace(&self.spell(ident, end + 1)))),
                true,
            ),
            None => (Some(SmolStr::new(self.tokens[ident].text)), false),
        }
    }

    /// Last identifier at angle depth zero before the parameter list.
    fn function_name(&self, from: usize, paren: usize) -> Option<SmolStr> {
        let mut angle = 0usize;
        let mut name = None;

        for idx in from..paren {
            let token = &self.tokens[idx];
            match token.kind {
                TokenKind::Lt => angle += 1,
                TokenKind::Gt => angle = angle.saturating_sub(1),
                TokenKind::OperatorKw if angle == 0 => {
                    let symbol = self.raw_text(idx + 1, paren);
                    return Some(SmolStr::new(format!("operator{symbol}")));
                }
                TokenKind::Ident if angle == 0 => name = Some(SmolStr::new(token.text)),
                _ => {}
            }
        }

        name
    }

    /// Declared name of `typedef <type> Name` when it is a single plain
    /// declarator (no function pointers, arrays, or comma lists).
    fn simple_declarator(&self, from: usize, to: usize) -> Option<SmolStr> {
        if to < from + 2 {
            return None;
        }
        let last = &self.tokens[to - 1];
        let before = &self.tokens[to - 2];
        if last.kind != TokenKind::Ident
            || matches!(
                before.kind,
                TokenKind::RParen | TokenKind::ColonColon | TokenKind::Comma
            )
        {
            return None;
        }

        let mut depth = 0usize;
        for token in &self.tokens[from..to] {
            match token.kind {
                TokenKind::Lt | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::Gt | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Comma if depth == 0 => return None,
                _ => {}
            }
        }

        Some(SmolStr::new(last.text))
    }

    /// Names declared by a template parameter list, `from..to` being the
    /// tokens between its angle brackets.
    fn template_params(&self, from: usize, to: usize) -> Vec<SmolStr> {
        let mut names = Vec::new();
        let mut depth = 0usize;
        let mut current = None;
        let mut in_default = false;

        for token in &self.tokens[from..to] {
            match token.kind {
                TokenKind::Lt | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::Gt | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ if depth > 0 => {}
                TokenKind::Comma => {
                    names.extend(current.take());
                    in_default = false;
                }
                TokenKind::Eq => in_default = true,
                TokenKind::Ident if !in_default && token.text != "typename" => {
                    current = Some(SmolStr::new(token.text));
                }
                _ => {}
            }
        }
        names.extend(current);
        names
    }

    // =========================================================================
    // ALIASES
    // =========================================================================

    fn parse_scoped_items(&mut self) -> Result<Vec<SyntaxNode>, AnalyzerError> {
        self.scopes.push(AliasScope::default());
        let items = self.parse_items(true);
        self.scopes.pop();
        items
    }

    /// Record `name` as an alias for tokens `from..to`, or as a shadow when
    /// the target is dependent.
    fn define_alias(&mut self, name: SmolStr, from: usize, to: usize) {
        if self.is_dependent(from, to) {
            self.shadow(name);
            return;
        }
        let target = self.spell(from, to);
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name, Some(target));
            }
            None => {
                self.file_aliases.insert(name, target);
            }
        }
    }

    fn shadow(&mut self, name: SmolStr) {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name, None);
            }
            None => {
                self.file_aliases.remove(&name);
            }
        }
    }

    /// Target names a member of a template argument, a template parameter,
    /// or another dependent alias.
    fn is_dependent(&self, from: usize, to: usize) -> bool {
        (from..to).any(|idx| {
            let token = &self.tokens[idx];
            match token.kind {
                TokenKind::TemplateKw => true,
                TokenKind::ColonColon => {
                    idx > from && self.tokens[idx - 1].kind == TokenKind::Gt
                }
                TokenKind::Ident => {
                    matches!(token.text, "typename" | "decltype")
                        || self.scoped_alias(token.text) == Some(None)
                }
                _ => false,
            }
        })
    }

    /// Innermost scoped binding of `name`, if any scope declares it.
    fn scoped_alias(&self, name: &str) -> Option<Option<&str>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map(Option::as_deref)
    }

    /// What the identifier at `idx` stands for, if it is an alias use.
    fn resolve(&self, idx: usize) -> Option<&str> {
        let token = &self.tokens[idx];
        if token.kind != TokenKind::Ident {
            return None;
        }
        if let Some(expansion) = self.macros.get(token.text) {
            return Some(expansion.as_str());
        }

        match idx.checked_sub(1).map(|prev| &self.tokens[prev]) {
            // Members are not alias uses.
            Some(prev) if prev.text == "." => None,
            Some(prev) if prev.kind == TokenKind::ColonColon => {
                if self.namespace_qualified(idx - 1) {
                    self.file_aliases.get(token.text).map(String::as_str)
                } else {
                    None
                }
            }
            _ => match self.scoped_alias(token.text) {
                Some(binding) => binding,
                None => self.file_aliases.get(token.text).map(String::as_str),
            },
        }
    }

    /// Whether the qualifier chain ending at the `::` at `colons` names only
    /// namespaces (or the global namespace).
    fn namespace_qualified(&self, colons: usize) -> bool {
        let mut colons = colons;
        loop {
            let Some(qualifier) = colons.checked_sub(1).map(|idx| &self.tokens[idx]) else {
                return true;
            };
            match qualifier.kind {
                TokenKind::Ident if self.namespaces.contains(qualifier.text) => {
                    match colons.checked_sub(2) {
                        Some(prev) if self.tokens[prev].kind == TokenKind::ColonColon => {
                            colons = prev;
                        }
                        _ => return true,
                    }
                }
                TokenKind::Ident | TokenKind::Gt | TokenKind::RParen | TokenKind::Number => {
                    return false;
                }
                _ => return true,
            }
        }
    }

    // =========================================================================
    // TOKEN HELPERS
    // =========================================================================

    fn peek_kind(&self) -> Option<TokenKind> {
        self.nth_kind(0)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn prev_kind(&self) -> Option<TokenKind> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn offset(&self) -> TextSize {
        self.tokens
            .get(self.pos)
            .map(|t| t.range.start())
            .unwrap_or(self.end)
    }

    /// Range from token `start` to the last consumed token.
    fn range_from(&self, start: usize) -> TextRange {
        let begin = self
            .tokens
            .get(start)
            .map(|t| t.range.start())
            .unwrap_or(self.end);
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.range.end())
            .unwrap_or(begin);
        TextRange::new(begin, end.max(begin))
    }

    /// Consume up to and including the terminating `;`, swallowing balanced
    /// braces. Returns the index one past the last statement token.
    fn collect_statement(&mut self) -> Result<usize, AnalyzerError> {
        loop {
            match self.peek_kind() {
                None | Some(TokenKind::RBrace) => return Ok(self.pos),
                Some(TokenKind::Semicolon) => {
                    let end = self.pos;
                    self.pos += 1;
                    return Ok(end);
                }
                Some(TokenKind::LBrace) => self.skip_braces()?,
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Skip a balanced `{ ... }` group starting at the current token.
    fn skip_braces(&mut self) -> Result<(), AnalyzerError> {
        let open = self.offset();
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind() {
            self.pos += 1;
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(AnalyzerError::UnexpectedEof {
            offset: open.into(),
        })
    }

    /// Skip a balanced `< ... >` template parameter list.
    fn skip_angles(&mut self) -> Result<(), AnalyzerError> {
        let open = self.offset();
        let mut angle = 0usize;
        let mut paren = 0usize;
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::LParen => paren += 1,
                TokenKind::RParen => paren = paren.saturating_sub(1),
                TokenKind::Lt if paren == 0 => angle += 1,
                TokenKind::Gt if paren == 0 => {
                    angle -= 1;
                    if angle == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace => {
                    return Err(AnalyzerError::UnterminatedTemplateHead {
                        offset: open.into(),
                    });
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(AnalyzerError::UnterminatedTemplateHead {
            offset: open.into(),
        })
    }

    /// Token texts joined without separators (names, namespaces).
    fn raw_text(&self, from: usize, to: usize) -> String {
        self.tokens[from..to].iter().map(|t| t.text).collect()
    }

    /// Resolved spelling of tokens `from..to`, joined by single spaces.
    fn spell(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        for idx in from..to {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(self.resolve(idx).unwrap_or(self.tokens[idx].text));
        }
        out
    }
}
