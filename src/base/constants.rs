//! Domain constants shared across the porter.

/// Name of the generic shape the porter recognizes.
pub const MATRIX_TEMPLATE: &str = "Matrix";

/// Placeholder written for entries awaiting a hand-picked name.
pub const PENDING_PLACEHOLDER: &str = "TODO";

/// Top-level key of the persisted mapping document.
pub const MAPPINGS_KEY: &str = "mappings";

/// YAML tag marking a curated name in the mapping document.
pub const EXPLICIT_TAG: &str = "explicit";

/// Default prefix for derived symbol names.
pub const DEFAULT_SYMBOL_PREFIX: &str = "EC_Matrix";

/// Prefix for names derived from keys that are not a matrix shape.
pub const GENERIC_SYMBOL_PREFIX: &str = "EC_Generic_";

/// Include guard of the generated header.
pub const DEFAULT_INCLUDE_GUARD: &str = "EC_GENERATED_H";

/// Uniform dispatch entry points emitted in the generated header.
pub const ADD_DISPATCH: &str = "ec_add";
pub const MUL_DISPATCH: &str = "ec_mul";

/// Header file extensions scanned by default.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp"];

pub const DEFAULT_SOURCE_DIR: &str = "Eigen";
pub const DEFAULT_MAPPING_PATH: &str = "porter/mapping.yaml";
pub const DEFAULT_OUTPUT_PATH: &str = "eigenc/include/ec_generated.h";
pub const DEFAULT_CXX_STANDARD: &str = "-std=c++17";

/// Extension used for per-file AST dumps.
pub const AST_DUMP_EXT: &str = "ast";

/// Config file picked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "porter.yaml";
