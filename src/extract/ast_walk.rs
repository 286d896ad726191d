use super::{Extraction, ExtractionStrategy, StrategyKind};
use crate::parser::{HeaderTree, NodeKind, SyntaxNode};
use crate::spec::{CanonicalSpec, find_specs};

/// Walks resolved spellings of a [`HeaderTree`].
pub struct AstWalk<'t> {
    tree: &'t HeaderTree,
}

impl<'t> AstWalk<'t> {
    pub fn new(tree: &'t HeaderTree) -> Self {
        Self { tree }
    }
}

impl ExtractionStrategy for AstWalk<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AstWalk
    }

    /// The tree already holds everything; `source` is not re-read.
    fn extract(&self, _source: &str) -> Extraction {
        let mut out = Extraction::default();
        visit(self.tree.root(), true, &mut out);
        out
    }
}

fn visit(node: &SyntaxNode, at_file_scope: bool, out: &mut Extraction) {
    out.specs.extend(find_specs(&node.spelling));

    if at_file_scope
        && matches!(node.kind, NodeKind::ClassTemplate | NodeKind::FunctionTemplate)
    {
        if let Some(name) = &node.name {
            out.pending.insert(CanonicalSpec::new(name));
        }
    }

    let children_at_file_scope = at_file_scope && node.kind.is_file_scope();
    for child in &node.children {
        visit(child, children_at_file_scope, out);
    }
}
