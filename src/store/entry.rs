use crate::base::constants::PENDING_PLACEHOLDER;
use crate::spec::{CanonicalSpec, SymbolName, SymbolNamer};

/// Where a mapping entry's name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Curated by a person, or flagged for curation. Never replaced by a
    /// derived name.
    Explicit,
    /// Produced by the [`SymbolNamer`].
    Derived,
}

/// The value side of a mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    Named(SymbolName),
    /// Awaiting a hand-picked name; persisted as `TODO`.
    Pending,
}

impl Binding {
    /// Parse a persisted value.
    pub fn from_persisted(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == PENDING_PLACEHOLDER {
            Self::Pending
        } else {
            Self::Named(SymbolName::new(value))
        }
    }

    pub fn as_persisted(&self) -> &str {
        match self {
            Self::Named(symbol) => symbol.as_str(),
            Self::Pending => PENDING_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub binding: Binding,
    pub provenance: Provenance,
}

impl MappingEntry {
    pub fn derived(symbol: SymbolName) -> Self {
        Self {
            binding: Binding::Named(symbol),
            provenance: Provenance::Derived,
        }
    }

    pub fn explicit(symbol: SymbolName) -> Self {
        Self {
            binding: Binding::Named(symbol),
            provenance: Provenance::Explicit,
        }
    }

    pub fn pending() -> Self {
        Self {
            binding: Binding::Pending,
            provenance: Provenance::Explicit,
        }
    }

    /// A hand-picked binding, either a name or the placeholder.
    pub fn curated(binding: Binding) -> Self {
        match binding {
            Binding::Named(symbol) => Self::explicit(symbol),
            Binding::Pending => Self::pending(),
        }
    }

    /// Recover provenance for an untagged binding read back from storage.
    ///
    /// A name equal to what the namer would produce is taken as derived and
    /// anything else as explicit.
    pub fn classify(spec: &CanonicalSpec, binding: Binding, namer: &SymbolNamer) -> Self {
        match binding {
            Binding::Named(symbol) if symbol == namer.symbol(spec) => Self::derived(symbol),
            binding => Self::curated(binding),
        }
    }

    pub fn symbol(&self) -> Option<&SymbolName> {
        match &self.binding {
            Binding::Named(symbol) => Some(symbol),
            Binding::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.binding == Binding::Pending
    }
}
