//! ec-porter - Matrix specialization porter
//!
//! Scans C++ headers for `Matrix<Scalar,Rows,Cols>` specializations, keeps
//! the specialization → C name mapping on disk and generates a C header of value
//! types and kernels from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use porter::base::constants::DEFAULT_CONFIG_PATH;
use porter::codegen::GeneratedUnit;
use porter::project::{Porter, PorterConfig, ScanReport};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "ec-porter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration (default: porter.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Header tree to scan
    #[arg(long)]
    source: Option<PathBuf>,

    /// Mapping store location
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Generated header location
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the analyzer and text-scan every header
    #[arg(long)]
    no_analyzer: bool,

    /// Write per-header AST dumps into this directory
    #[arg(long)]
    ast_dump_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan headers and update the mapping store
    Scan,

    /// Generate the C header from the mapping store
    Generate,

    /// Scan, then generate
    Run,

    /// List keys still waiting for a curated name
    Pending,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(&cli)?;
    let porter = Porter::new(config);

    match cli.command {
        Commands::Scan => {
            let mut store = porter.load_store().context("failed to load mapping store")?;
            let report = porter.scan(&mut store).context("scan failed")?;
            print_scan(&report);
        }
        Commands::Generate => {
            let store = porter.load_store().context("failed to load mapping store")?;
            let unit = porter.generate(&store).context("generation failed")?;
            print_unit(&unit, &porter.config().output_path);
        }
        Commands::Run => {
            let (report, unit) = porter.run().context("run failed")?;
            print_scan(&report);
            print_unit(&unit, &porter.config().output_path);
        }
        Commands::Pending => {
            let store = porter.load_store().context("failed to load mapping store")?;
            for spec in store.pending() {
                println!("{spec}");
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<PorterConfig> {
    let mut config = match &cli.config {
        Some(path) => PorterConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
            PorterConfig::load(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("failed to load config {DEFAULT_CONFIG_PATH}"))?
        }
        None => PorterConfig::default(),
    };

    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(mapping) = &cli.mapping {
        config.mapping_path = mapping.clone();
    }
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(dir) = &cli.ast_dump_dir {
        config.ast_dump_dir = Some(dir.clone());
    }
    if cli.no_analyzer {
        config.use_analyzer = false;
    }

    Ok(config)
}

fn print_scan(report: &ScanReport) {
    println!(
        "scanned {} file(s) ({} ast-walk, {} text-scan), {} new mapping(s), {} pending",
        report.files,
        report.ast_walk,
        report.text_scan,
        report.added.len(),
        report.pending
    );
}

fn print_unit(unit: &GeneratedUnit, path: &Path) {
    println!(
        "wrote {} type(s) to {}, skipped {}",
        unit.emitted.len(),
        path.display(),
        unit.skipped.len()
    );
    for skipped in &unit.skipped {
        println!("  skipped {}: {}", skipped.spec, skipped.reason);
    }
}
