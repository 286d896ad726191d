//! Persisted mapping from canonical spec to generated symbol name.
//!
//! The run cycle is load → merge → persist, once per header:
//!
//! ```text
//! MappingStore::load ──► merge_extraction(file 1) ──► save
//!                        merge_extraction(file 2) ──► save
//!                        ...                          save (final)
//! ```
//!
//! Merging is a left-biased union: whatever is already stored wins, so
//! explicit entries survive any number of rescans.

mod entry;
mod persist;

use std::collections::BTreeMap;

use crate::extract::Extraction;
use crate::spec::{CanonicalSpec, SymbolNamer};

pub use entry::{Binding, MappingEntry, Provenance};
pub use persist::{MappingDocument, PersistedBinding};

/// What one merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Keys inserted by this merge, in key order.
    pub added: Vec<CanonicalSpec>,
    /// How many of `added` were inserted as pending.
    pub pending: usize,
    /// How many of `added` got a fallback name.
    pub fallback_named: usize,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

/// The full spec → name table, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStore {
    entries: BTreeMap<CanonicalSpec, MappingEntry>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, spec: &CanonicalSpec) -> Option<&MappingEntry> {
        self.entries.get(spec)
    }

    pub fn contains(&self, spec: &CanonicalSpec) -> bool {
        self.entries.contains_key(spec)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalSpec, &MappingEntry)> {
        self.entries.iter()
    }

    /// Insert or replace one entry, returning the previous one.
    pub fn insert(&mut self, spec: CanonicalSpec, entry: MappingEntry) -> Option<MappingEntry> {
        self.entries.insert(spec, entry)
    }

    /// Left-biased union: entries of `self` win over `incoming`.
    ///
    /// Associative and idempotent, so merging the same discoveries any
    /// number of times yields the same store.
    pub fn merged(mut self, incoming: MappingStore) -> MappingStore {
        for (spec, entry) in incoming.entries {
            self.entries.entry(spec).or_insert(entry);
        }
        self
    }

    /// New entries for one file's discoveries, before merging.
    ///
    /// Keys flagged pending become explicit placeholders; everything else
    /// is named by `namer`.
    pub fn from_extraction(extraction: &Extraction, namer: &SymbolNamer) -> MappingStore {
        let entries = extraction
            .keys()
            .map(|spec| {
                let entry = if extraction.is_pending(spec) {
                    MappingEntry::pending()
                } else {
                    MappingEntry::derived(namer.symbol(spec))
                };
                (spec.clone(), entry)
            })
            .collect();
        MappingStore { entries }
    }

    /// Merge one file's discoveries in place.
    pub fn merge_extraction(
        &mut self,
        extraction: &Extraction,
        namer: &SymbolNamer,
    ) -> MergeReport {
        let mut report = MergeReport::default();

        for (spec, entry) in Self::from_extraction(extraction, namer).entries {
            if self.entries.contains_key(&spec) {
                continue;
            }

            if entry.is_pending() {
                report.pending += 1;
            } else if let Some(fallback) = namer.name(&spec).fallback {
                tracing::debug!("{spec}: fallback name ({fallback:?})");
                report.fallback_named += 1;
            }

            report.added.push(spec.clone());
            self.entries.insert(spec, entry);
        }

        report
    }

    /// Apply curated names. They replace whatever is stored for the key.
    ///
    /// Returns how many entries changed.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut changed = 0;
        for (raw_spec, name) in overrides {
            let spec = CanonicalSpec::new(raw_spec);
            let entry = MappingEntry::curated(Binding::from_persisted(name));
            if self.entries.get(&spec) != Some(&entry) {
                self.entries.insert(spec, entry);
                changed += 1;
            }
        }
        changed
    }

    /// Keys still waiting for a hand-picked name.
    pub fn pending(&self) -> impl Iterator<Item = &CanonicalSpec> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_pending())
            .map(|(spec, _)| spec)
    }
}

impl FromIterator<(CanonicalSpec, MappingEntry)> for MappingStore {
    fn from_iter<T: IntoIterator<Item = (CanonicalSpec, MappingEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
