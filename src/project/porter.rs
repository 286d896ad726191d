use std::path::{Path, PathBuf};

use super::collection::collect_header_paths;
use super::config::PorterConfig;
use crate::base::constants::AST_DUMP_EXT;
use crate::codegen::{self, GeneratedUnit};
use crate::error::{PorterError, Result};
use crate::extract::{Extractor, FileExtraction, StrategyKind};
use crate::parser::HeaderTree;
use crate::spec::{CanonicalSpec, SymbolNamer};
use crate::store::MappingStore;

/// Totals for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub files: usize,
    pub ast_walk: usize,
    pub text_scan: usize,
    /// Files where the analyzer was present but failed.
    pub fallbacks: usize,
    /// Keys new to the store, in discovery order.
    pub added: Vec<CanonicalSpec>,
    pub pending: usize,
}

impl ScanReport {
    fn record(&mut self, file: &FileExtraction) {
        self.files += 1;
        match file.strategy {
            StrategyKind::AstWalk => self.ast_walk += 1,
            StrategyKind::TextScan => self.text_scan += 1,
        }
        if file.fallback_reason.is_some() {
            self.fallbacks += 1;
        }
    }
}

/// The extract → merge → persist pipeline, then generation.
pub struct Porter {
    config: PorterConfig,
    extractor: Extractor,
    namer: SymbolNamer,
}

impl Porter {
    pub fn new(config: PorterConfig) -> Self {
        let extractor = if config.use_analyzer {
            Extractor::with_header_analyzer(config.compile_flags())
        } else {
            Extractor::text_only()
        };
        Self::with_extractor(config, extractor)
    }

    /// Use a custom extractor, e.g. one with another analyzer backend.
    pub fn with_extractor(config: PorterConfig, extractor: Extractor) -> Self {
        let namer = config.namer();
        Self {
            config,
            extractor,
            namer,
        }
    }

    pub fn config(&self) -> &PorterConfig {
        &self.config
    }

    pub fn namer(&self) -> &SymbolNamer {
        &self.namer
    }

    /// Load the persisted store and apply configured overrides.
    pub fn load_store(&self) -> Result<MappingStore> {
        let mut store = MappingStore::load(&self.config.mapping_path, &self.namer)?;
        let changed = store.apply_overrides(
            self.config
                .overrides
                .iter()
                .map(|(spec, name)| (spec.as_str(), name.as_str())),
        );
        if changed > 0 {
            tracing::info!("Applied {changed} override(s)");
        }
        Ok(store)
    }

    /// Scan every header under the configured source directory.
    pub fn scan(&self, store: &mut MappingStore) -> Result<ScanReport> {
        let paths = collect_header_paths(&self.config.source_dir, &self.config.extensions)?;
        tracing::info!(
            "Scanning {} header(s) under {}",
            paths.len(),
            self.config.source_dir.display()
        );
        self.scan_files(store, &paths)
    }

    /// Process `paths` in order, persisting the store after each file.
    ///
    /// A read or write failure stops the scan; everything merged before it
    /// is already on disk.
    pub fn scan_files(&self, store: &mut MappingStore, paths: &[PathBuf]) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for path in paths {
            let bytes = std::fs::read(path).map_err(|e| PorterError::read(path, e))?;
            let source = String::from_utf8_lossy(&bytes);

            let file = self.extractor.extract(path, &source);
            report.record(&file);

            if let Some(tree) = &file.tree {
                self.dump_tree(path, tree)?;
            }

            let merge = store.merge_extraction(&file.extraction, &self.namer);
            tracing::debug!(
                "{}: {} via {}, {} new",
                path.display(),
                file.extraction.keys().count(),
                file.strategy.as_str(),
                merge.added.len()
            );
            report.pending += merge.pending;
            report.added.extend(merge.added);

            store.save(&self.config.mapping_path)?;
        }

        store.save(&self.config.mapping_path)?;

        tracing::info!(
            "Scanned {} file(s): {} ast-walk, {} text-scan ({} fallback), {} new entr{}",
            report.files,
            report.ast_walk,
            report.text_scan,
            report.fallbacks,
            report.added.len(),
            if report.added.len() == 1 { "y" } else { "ies" }
        );
        Ok(report)
    }

    /// Render the store and write it to the configured output path.
    pub fn generate(&self, store: &MappingStore) -> Result<GeneratedUnit> {
        let unit = codegen::generate(store, &self.config.codegen_options());
        write_creating_parents(&self.config.output_path, &unit.text)?;
        tracing::info!("Wrote {}", self.config.output_path.display());
        Ok(unit)
    }

    /// Load, scan and generate in one go.
    pub fn run(&self) -> Result<(ScanReport, GeneratedUnit)> {
        let mut store = self.load_store()?;
        let report = self.scan(&mut store)?;
        let unit = self.generate(&store)?;
        Ok((report, unit))
    }

    fn dump_tree(&self, path: &Path, tree: &HeaderTree) -> Result<()> {
        let Some(dir) = &self.config.ast_dump_dir else {
            return Ok(());
        };
        let target = dir.join(dump_file_name(&self.config.source_dir, path));
        write_creating_parents(&target, &tree.dump())
    }
}

/// `Core/Matrix.h` under `source_dir` becomes `Core_Matrix.h.ast`.
pub fn dump_file_name(source_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(source_dir).unwrap_or(path);
    let flat: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("{}.{AST_DUMP_EXT}", flat.join("_"))
}

fn write_creating_parents(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PorterError::write(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| PorterError::write(path, e))
}
