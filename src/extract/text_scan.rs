use super::{Extraction, ExtractionStrategy, StrategyKind};
use crate::spec::find_specs;

/// Pattern scan over raw source text.
///
/// Matches inside comments and string literals as well; that imprecision is
/// accepted in exchange for working without an analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextScan;

impl ExtractionStrategy for TextScan {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TextScan
    }

    fn extract(&self, source: &str) -> Extraction {
        Extraction {
            specs: find_specs(source).collect(),
            pending: Default::default(),
        }
    }
}
