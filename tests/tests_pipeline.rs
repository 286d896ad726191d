//! End-to-end scan → persist → reload behaviour.

mod helpers;

use std::fs;

use helpers::Workspace;
use porter::error::PorterError;
use porter::project::Porter;
use porter::spec::{CanonicalSpec, SymbolNamer};
use porter::store::{MappingEntry, MappingStore, Provenance};

const CORE_HEADER: &str = r#"
#pragma once
namespace Eigen {

template <typename Scalar, int Rows, int Cols>
class Matrix;

typedef Matrix<float, 3, 3> Matrix3f;

struct Pose {
    Matrix<double, 4, 4> transform;   // homogeneous
    Eigen::Matrix<float, 3, 1> axis;
};

} // namespace Eigen
"#;

fn key(spec: &str) -> CanonicalSpec {
    CanonicalSpec::new(spec)
}

#[test]
fn test_first_run_populates_store() {
    let ws = Workspace::new();
    ws.header("Core/Pose.h", CORE_HEADER);

    let porter = Porter::new(ws.config());
    let (report, unit) = porter.run().unwrap();

    assert_eq!(report.files, 1);
    assert_eq!(report.ast_walk, 1);

    let store = MappingStore::load(&porter.config().mapping_path, &SymbolNamer::default()).unwrap();
    let names: Vec<_> = store
        .iter()
        .map(|(spec, entry)| (spec.as_str().to_string(), entry.binding.as_persisted().to_string()))
        .collect();
    assert_eq!(
        names,
        [
            ("Matrix".to_string(), "TODO".to_string()),
            ("Matrix<double,4,4>".to_string(), "EC_Matrix4d".to_string()),
            ("Matrix<float,3,1>".to_string(), "EC_Matrix3x1f".to_string()),
            ("Matrix<float,3,3>".to_string(), "EC_Matrix3f".to_string()),
        ]
    );

    assert_eq!(unit.emitted.len(), 3);
    assert_eq!(unit.skipped.len(), 1);
}

#[test]
fn test_repeated_runs_do_not_change_the_store() {
    let ws = Workspace::new();
    ws.header("Core/Pose.h", CORE_HEADER);
    ws.header("Core/Other.hpp", "Matrix<int, 2, 2> counts;\n");

    let porter = Porter::new(ws.config());
    porter.run().unwrap();
    let first_mapping = fs::read_to_string(&porter.config().mapping_path).unwrap();
    let first_header = fs::read_to_string(&porter.config().output_path).unwrap();

    let (report, _) = porter.run().unwrap();
    assert!(report.added.is_empty());
    assert_eq!(fs::read_to_string(&porter.config().mapping_path).unwrap(), first_mapping);
    assert_eq!(fs::read_to_string(&porter.config().output_path).unwrap(), first_header);
}

#[test]
fn test_hand_edits_survive_rescans() {
    let ws = Workspace::new();
    ws.header("Core/Pose.h", CORE_HEADER);

    let porter = Porter::new(ws.config());
    porter.run().unwrap();

    // Curate one name and reset another to a placeholder.
    let path = &porter.config().mapping_path;
    let edited = fs::read_to_string(path)
        .unwrap()
        .replace("EC_Matrix4d", "Transform4")
        .replace("EC_Matrix3x1f", "TODO");
    fs::write(path, edited).unwrap();

    porter.run().unwrap();

    let store = MappingStore::load(path, porter.namer()).unwrap();
    let transform = store.get(&key("Matrix<double,4,4>")).unwrap();
    assert_eq!(transform.symbol().unwrap().as_str(), "Transform4");
    assert_eq!(transform.provenance, Provenance::Explicit);
    assert!(store.get(&key("Matrix<float,3,1>")).unwrap().is_pending());

    let header = fs::read_to_string(&porter.config().output_path).unwrap();
    assert!(header.contains("typedef struct Transform4 {"));
    assert!(!header.contains("EC_Matrix3x1f"));
}

#[test]
fn test_crash_between_files_keeps_first_file() {
    let ws = Workspace::new();
    let a = ws.header("a.h", "Matrix<float,2,2> a;\n");
    let b = ws.header("b.h", "Matrix<double,4,4> b;\n");

    let porter = Porter::new(ws.config());
    let mut store = porter.load_store().unwrap();

    // `b.h` disappears before it is read.
    fs::remove_file(&b).unwrap();
    let err = porter.scan_files(&mut store, &[a, b]).unwrap_err();
    assert!(matches!(err, PorterError::Read { .. }));

    let reloaded = MappingStore::load(&porter.config().mapping_path, porter.namer()).unwrap();
    let keys: Vec<_> = reloaded.iter().map(|(spec, _)| spec.clone()).collect();
    assert_eq!(keys, [key("Matrix<float,2,2>")]);
}

#[test]
fn test_alias_divergence_between_strategies() {
    let ws = Workspace::new();
    ws.header("alias.h", "using Real = double;\nMatrix<Real, 2, 2> m;\n");

    let with_analyzer = Porter::new(ws.config());
    let mut resolved = MappingStore::new();
    with_analyzer.scan(&mut resolved).unwrap();
    assert!(resolved.contains(&key("Matrix<double,2,2>")));

    let mut config = ws.config();
    config.use_analyzer = false;
    config.mapping_path = ws.root().join("text-only.yaml");
    let text_only = Porter::new(config);
    let mut literal = MappingStore::new();
    text_only.scan(&mut literal).unwrap();
    assert!(literal.contains(&key("Matrix<Real,2,2>")));
    assert!(!literal.contains(&key("Matrix<double,2,2>")));
}

#[test]
fn test_seeded_placeholder_is_not_generated() {
    let ws = Workspace::new();
    ws.header("a.h", "Matrix<double,4,4> m;\n");

    let porter = Porter::new(ws.config());
    let seeded: MappingStore = [(key("Matrix<double,4,4>"), MappingEntry::pending())]
        .into_iter()
        .collect();
    seeded.save(&porter.config().mapping_path).unwrap();

    let (_, unit) = porter.run().unwrap();
    assert!(unit.emitted.is_empty());
    assert_eq!(unit.skipped.len(), 1);
    assert!(!unit.text.contains("_Generic"));
}
