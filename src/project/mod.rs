//! The scan → merge → persist → generate pipeline and its configuration.

mod collection;
mod config;
mod porter;

pub use collection::collect_header_paths;
pub use config::PorterConfig;
pub use porter::{Porter, ScanReport, dump_file_name};

#[cfg(test)]
mod tests;
