#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::PorterError;
use crate::project::{Porter, PorterConfig, dump_file_name};
use crate::spec::{CanonicalSpec, SymbolName};
use crate::store::{MappingEntry, MappingStore, Provenance};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn source_dir(&self) -> PathBuf {
        self.dir.path().join("Eigen")
    }

    fn header(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.source_dir().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn config(&self) -> PorterConfig {
        PorterConfig {
            source_dir: self.source_dir(),
            mapping_path: self.dir.path().join("porter/mapping.yaml"),
            output_path: self.dir.path().join("out/include/ec_generated.h"),
            ..PorterConfig::default()
        }
    }

    fn reload(&self, porter: &Porter) -> MappingStore {
        MappingStore::load(&porter.config().mapping_path, porter.namer()).unwrap()
    }
}

fn key(spec: &str) -> CanonicalSpec {
    CanonicalSpec::new(spec)
}

#[test]
fn test_scan_persists_discoveries() {
    let fx = Fixture::new();
    fx.header("Core/A.h", "namespace Eigen { Matrix<double, 4, 4> pose; }\n");
    fx.header("Core/B.hpp", "Eigen::Matrix<float,2,2> small;\n");
    fx.header("Core/notes.txt", "Matrix<int,9,9> ignored;\n");

    let porter = Porter::new(fx.config());
    let mut store = porter.load_store().unwrap();
    let report = porter.scan(&mut store).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(report.ast_walk, 2);
    assert_eq!(report.text_scan, 0);
    assert_eq!(report.added, vec![key("Matrix<double,4,4>"), key("Matrix<float,2,2>")]);

    let reloaded = fx.reload(&porter);
    assert_eq!(reloaded, store);
    assert_eq!(
        reloaded.get(&key("Matrix<double,4,4>")).unwrap().symbol().unwrap().as_str(),
        "EC_Matrix4d"
    );
    assert!(!reloaded.contains(&key("Matrix<int,9,9>")));
}

#[test]
fn test_rescan_is_idempotent() {
    let fx = Fixture::new();
    fx.header("A.h", "Matrix<double,3,3> a;\ntemplate <typename T> class Holder {};\n");

    let porter = Porter::new(fx.config());
    let mut store = porter.load_store().unwrap();
    porter.scan(&mut store).unwrap();
    let first = fs::read_to_string(&porter.config().mapping_path).unwrap();

    let mut store = porter.load_store().unwrap();
    let report = porter.scan(&mut store).unwrap();
    let second = fs::read_to_string(&porter.config().mapping_path).unwrap();

    assert!(report.added.is_empty());
    assert_eq!(first, second);
    assert!(second.contains("Holder: TODO"), "{second}");
}

#[test]
fn test_explicit_placeholder_survives_scan() {
    let fx = Fixture::new();
    fx.header("A.h", "Matrix<double,4,4> m;\n");

    let porter = Porter::new(fx.config());
    let seeded: MappingStore = [(key("Matrix<double,4,4>"), MappingEntry::pending())]
        .into_iter()
        .collect();
    seeded.save(&porter.config().mapping_path).unwrap();

    let mut store = porter.load_store().unwrap();
    porter.scan(&mut store).unwrap();

    let entry = fx.reload(&porter).get(&key("Matrix<double,4,4>")).cloned().unwrap();
    assert!(entry.is_pending());
    assert_eq!(entry.provenance, Provenance::Explicit);
}

#[test]
fn test_interrupted_scan_keeps_earlier_files() {
    let fx = Fixture::new();
    let first = fx.header("a.h", "Matrix<float,2,2> a;\n");
    let missing = fx.source_dir().join("b.h");

    let porter = Porter::new(fx.config());
    let mut store = MappingStore::new();
    let err = porter
        .scan_files(&mut store, &[first, missing.clone()])
        .unwrap_err();
    assert!(matches!(err, PorterError::Read { ref path, .. } if *path == missing));

    let reloaded = fx.reload(&porter);
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded.contains(&key("Matrix<float,2,2>")));
}

#[test]
fn test_analyzer_failure_falls_back_per_file() {
    let fx = Fixture::new();
    fx.header("broken.h", "namespace Eigen { Matrix<double,4,4> m;\n");
    fx.header("fine.h", "Matrix<int,2,2> i;\n");

    let porter = Porter::new(fx.config());
    let mut store = MappingStore::new();
    let report = porter.scan(&mut store).unwrap();

    assert_eq!(report.ast_walk, 1);
    assert_eq!(report.text_scan, 1);
    assert_eq!(report.fallbacks, 1);
    assert!(store.contains(&key("Matrix<double,4,4>")));
    assert!(store.contains(&key("Matrix<int,2,2>")));
}

#[test]
fn test_text_only_mode() {
    let fx = Fixture::new();
    fx.header("A.h", "// Matrix<float,3,3> in a comment\n");

    let config = PorterConfig {
        use_analyzer: false,
        ..fx.config()
    };
    let porter = Porter::new(config);
    let mut store = MappingStore::new();
    let report = porter.scan(&mut store).unwrap();

    assert_eq!(report.text_scan, 1);
    assert_eq!(report.fallbacks, 0);
    assert!(store.contains(&key("Matrix<float,3,3>")));
}

#[test]
fn test_ast_dumps_are_written() {
    let fx = Fixture::new();
    fx.header("Core/Matrix.h", "Matrix<float,2,2> a;\n");
    let dump_dir = fx.dir.path().join("dumps");

    let config = PorterConfig {
        ast_dump_dir: Some(dump_dir.clone()),
        ..fx.config()
    };
    let porter = Porter::new(config);
    porter.scan(&mut MappingStore::new()).unwrap();

    let dump = fs::read_to_string(dump_dir.join("Core_Matrix.h.ast")).unwrap();
    assert!(dump.starts_with("TranslationUnit"), "{dump}");
    assert!(dump.contains("Declaration"), "{dump}");
    assert!(dump.contains("Matrix < float , 2 , 2 > a"), "{dump}");
}

#[test]
fn test_dump_file_name() {
    let root = Path::new("/src/Eigen");
    assert_eq!(
        dump_file_name(root, &root.join("Core").join("Matrix.h")),
        "Core_Matrix.h.ast"
    );
    assert_eq!(dump_file_name(root, Path::new("other/Dense.h")), "other_Dense.h.ast");
}

#[test]
fn test_overrides_and_generation() {
    let fx = Fixture::new();
    fx.header("A.h", "Matrix<double,4,4> m;\nMatrix<float,2,2> f;\n");

    let mut config = fx.config();
    config
        .overrides
        .insert("Matrix<double, 4, 4>".to_string(), "Pose4".to_string());
    let porter = Porter::new(config);

    let (report, unit) = porter.run().unwrap();
    assert_eq!(report.added, vec![key("Matrix<float,2,2>")]);
    assert_eq!(
        unit.emitted,
        vec![SymbolName::from("Pose4"), SymbolName::from("EC_Matrix2f")]
    );

    let written = fs::read_to_string(&porter.config().output_path).unwrap();
    assert_eq!(written, unit.text);
    assert!(written.contains("typedef struct Pose4 {"));

    let stored = fx.reload(&porter);
    assert_eq!(
        stored.get(&key("Matrix<double,4,4>")).unwrap().symbol().unwrap().as_str(),
        "Pose4"
    );
}

#[test]
fn test_missing_source_dir() {
    let fx = Fixture::new();
    let porter = Porter::new(fx.config());
    let err = porter.scan(&mut MappingStore::new()).unwrap_err();
    assert!(matches!(err, PorterError::MissingSourceDir(_)));
}
