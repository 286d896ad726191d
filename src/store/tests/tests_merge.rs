use std::collections::BTreeSet;

use crate::extract::Extraction;
use crate::spec::{CanonicalSpec, SymbolName, SymbolNamer};
use crate::store::{Binding, MappingEntry, MappingStore, Provenance};

fn extraction(specs: &[&str], pending: &[&str]) -> Extraction {
    Extraction {
        specs: specs.iter().map(|s| CanonicalSpec::new(s)).collect(),
        pending: pending.iter().map(|s| CanonicalSpec::new(s)).collect(),
    }
}

#[test]
fn test_fresh_store_gets_one_derived_entry() {
    let namer = SymbolNamer::default();
    let mut store = MappingStore::new();

    let report = store.merge_extraction(&extraction(&["Matrix<float,2,2>"], &[]), &namer);

    assert_eq!(report.added, vec![CanonicalSpec::new("Matrix<float,2,2>")]);
    assert_eq!(store.len(), 1);
    let entry = store.get(&CanonicalSpec::new("Matrix<float,2,2>")).unwrap();
    assert_eq!(entry.provenance, Provenance::Derived);
    let name = entry.symbol().unwrap().as_str();
    assert!(name.contains('f') && name.contains('2'), "{name}");
    assert_eq!(name, "EC_Matrix2f");
}

#[test]
fn test_merge_is_idempotent() {
    let namer = SymbolNamer::default();
    let found = extraction(&["Matrix<float,2,2>", "Matrix<double,4,4>"], &["DenseBase"]);

    let mut once = MappingStore::new();
    once.merge_extraction(&found, &namer);

    let mut twice = once.clone();
    let report = twice.merge_extraction(&found, &namer);

    assert!(report.is_empty());
    assert_eq!(once, twice);
    assert_eq!(twice.len(), 3);
}

#[test]
fn test_explicit_placeholder_survives_rediscovery() {
    let namer = SymbolNamer::default();
    let spec = CanonicalSpec::new("Matrix<double,4,4>");
    let mut store = MappingStore::new();
    store.insert(spec.clone(), MappingEntry::pending());

    let report = store.merge_extraction(&extraction(&["Matrix<double,4,4>"], &[]), &namer);

    assert!(report.is_empty());
    assert_eq!(store.get(&spec), Some(&MappingEntry::pending()));
}

#[test]
fn test_curated_name_survives_rediscovery() {
    let namer = SymbolNamer::default();
    let spec = CanonicalSpec::new("Matrix<double,4,4>");
    let mut store = MappingStore::new();
    store.insert(spec.clone(), MappingEntry::explicit(SymbolName::from("Pose4")));

    store.merge_extraction(&extraction(&["Eigen::Matrix<double, 4, 4>"], &[]), &namer);

    assert_eq!(store.get(&spec).unwrap().symbol().unwrap().as_str(), "Pose4");
}

#[test]
fn test_pending_flag_wins_over_derivation_for_new_keys() {
    let namer = SymbolNamer::default();
    let mut store = MappingStore::new();

    let report = store.merge_extraction(
        &extraction(&["Matrix<float,3,3>"], &["Matrix<float,3,3>", "Matrix"]),
        &namer,
    );

    assert_eq!(report.pending, 2);
    assert!(store.get(&CanonicalSpec::new("Matrix<float,3,3>")).unwrap().is_pending());
    let pending: BTreeSet<_> = store.pending().cloned().collect();
    assert_eq!(pending.len(), 2);
}

#[test]
fn test_fallback_names_are_counted() {
    let namer = SymbolNamer::default();
    let mut store = MappingStore::new();
    let report = store.merge_extraction(&extraction(&["Matrix<half,2,2>"], &[]), &namer);
    assert_eq!(report.fallback_named, 1);
    assert_eq!(
        store
            .get(&CanonicalSpec::new("Matrix<half,2,2>"))
            .unwrap()
            .symbol()
            .unwrap()
            .as_str(),
        "EC_Matrix2x_half"
    );
}

#[test]
fn test_merged_is_left_biased_and_associative() {
    let namer = SymbolNamer::default();
    let spec = CanonicalSpec::new("Matrix<int,2,2>");

    let a: MappingStore = [(spec.clone(), MappingEntry::explicit(SymbolName::from("A")))]
        .into_iter()
        .collect();
    let b = MappingStore::from_extraction(&extraction(&["Matrix<int,2,2>", "Matrix<int,3,3>"], &[]), &namer);
    let c: MappingStore = [(
        CanonicalSpec::new("Matrix<int,3,3>"),
        MappingEntry::explicit(SymbolName::from("C")),
    )]
    .into_iter()
    .collect();

    let left = a.clone().merged(b.clone()).merged(c.clone());
    let right = a.clone().merged(b.clone().merged(c.clone()));
    assert_eq!(left, right);

    assert_eq!(left.get(&spec).unwrap().symbol().unwrap().as_str(), "A");
    assert_eq!(
        left.get(&CanonicalSpec::new("Matrix<int,3,3>"))
            .unwrap()
            .provenance,
        Provenance::Derived
    );
    assert_eq!(a.clone().merged(a.clone()), a);
}

#[test]
fn test_overrides_replace_stored_entries() {
    let namer = SymbolNamer::default();
    let mut store = MappingStore::new();
    store.merge_extraction(&extraction(&["Matrix<double,4,4>"], &["DenseBase"]), &namer);

    let changed = store.apply_overrides(
        [("Eigen::Matrix<double,4,4>", "Mat4"), ("DenseBase", "EC_DenseBase")],
    );
    assert_eq!(changed, 2);

    let entry = store.get(&CanonicalSpec::new("Matrix<double,4,4>")).unwrap();
    assert_eq!(entry.provenance, Provenance::Explicit);
    assert_eq!(entry.binding, Binding::Named(SymbolName::from("Mat4")));

    let again = store.apply_overrides([("DenseBase", "EC_DenseBase")]);
    assert_eq!(again, 0);
}

#[test]
fn test_override_matching_the_derived_name_is_explicit() {
    let namer = SymbolNamer::default();
    let spec = CanonicalSpec::new("Matrix<double,4,4>");
    let mut store = MappingStore::new();
    store.merge_extraction(&extraction(&["Matrix<double,4,4>"], &[]), &namer);
    assert_eq!(store.get(&spec).unwrap().provenance, Provenance::Derived);

    let changed = store.apply_overrides([("Matrix<double,4,4>", "EC_Matrix4d")]);
    assert_eq!(changed, 1);
    assert_eq!(
        store.get(&spec),
        Some(&MappingEntry::explicit(SymbolName::from("EC_Matrix4d")))
    );
}
