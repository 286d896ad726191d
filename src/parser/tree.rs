//! Declaration-level syntax tree produced by the header analyzer.

use std::fmt::Write;

use smol_str::SmolStr;
use text_size::TextRange;

/// Kinds of nodes in a [`HeaderTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    /// Primary class template or explicit full specialization.
    ClassTemplate,
    /// Class template partial specialization.
    ClassTemplatePartial,
    FunctionTemplate,
    /// Non-template `class`/`struct`/`union`.
    Record,
    /// `typedef` or `using` alias (including alias templates).
    TypeAlias,
    /// Anything else terminated by `;` or a body.
    Declaration,
    /// Brace-enclosed body of a function, enum or control statement.
    Block,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TranslationUnit => "TranslationUnit",
            Self::Namespace => "Namespace",
            Self::ClassTemplate => "ClassTemplate",
            Self::ClassTemplatePartial => "ClassTemplatePartial",
            Self::FunctionTemplate => "FunctionTemplate",
            Self::Record => "Record",
            Self::TypeAlias => "TypeAlias",
            Self::Declaration => "Declaration",
            Self::Block => "Block",
        }
    }

    /// Scopes that keep their children at file scope.
    pub fn is_file_scope(&self) -> bool {
        matches!(self, Self::TranslationUnit | Self::Namespace)
    }
}

/// One node of the tree.
///
/// `spelling` is the node's own head text (not its children's) with
/// aliases and command-line macros already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub name: Option<SmolStr>,
    pub spelling: String,
    pub range: TextRange,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, range: TextRange) -> Self {
        Self {
            kind,
            name: None,
            spelling: String::new(),
            range,
            children: Vec::new(),
        }
    }

    /// Pre-order traversal including `self`.
    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Parsed header: a `TranslationUnit` root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTree {
    root: SyntaxNode,
}

impl HeaderTree {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.root.descendants()
    }

    /// Indented textual dump, one node per line.
    ///
    /// ```text
    /// TranslationUnit 0..42
    ///   Namespace `Eigen` 0..42
    ///     TypeAlias `Matrix4d` 18..40: typedef Matrix < double , 4 , 4 > Matrix4d
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(&self.root, 0, &mut out);
        out
    }
}

fn dump_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{}", "", node.kind.as_str(), indent = depth * 2);
    if let Some(name) = &node.name {
        let _ = write!(out, " `{name}`");
    }
    let _ = write!(
        out,
        " {}..{}",
        u32::from(node.range.start()),
        u32::from(node.range.end())
    );
    if !node.spelling.is_empty() {
        let _ = write!(out, ": {}", node.spelling);
    }
    out.push('\n');

    for child in &node.children {
        dump_node(child, depth + 1, out);
    }
}
