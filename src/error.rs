use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the foundry library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the I/O edges (catalog and request documents, exports).
///
/// Catalog loading never surfaces these to callers directly: they are folded
/// into validation messages and the built-in fallback catalog is used instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog source was not found at the resolved path.
    #[error("module blueprint catalog missing: {path}")]
    CatalogMissing { path: PathBuf },

    /// The catalog source exists but contains only whitespace.
    #[error("module blueprint catalog is empty ({source_name})")]
    CatalogEmpty { source_name: String },

    /// JSON document could not be parsed.
    #[error("failed to parse json document ({source_name}): {message}")]
    Json { source_name: String, message: String },

    /// YAML document could not be parsed.
    #[error("failed to parse yaml document ({source_name}): {message}")]
    Yaml { source_name: String, message: String },

    /// A resolve request was structurally valid but unusable.
    #[error("invalid resolve request: {message}")]
    InvalidRequest { message: String },

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
