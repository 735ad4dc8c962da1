//! Process configuration read from `FOUNDRY_*` environment variables.

use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_CATALOG_PATH: &str = "data/module_blueprint_catalog.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundryConfig {
    /// Catalog document used when no path is given on the command line.
    pub catalog_path: PathBuf,
    /// Worker threads for batch resolution; 0 means the rayon default.
    pub workers: usize,
}

impl Default for FoundryConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            workers: 0,
        }
    }
}

impl FoundryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank or unparsable values
    /// keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup("FOUNDRY_CATALOG").filter(|value| !value.trim().is_empty()) {
            config.catalog_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup("FOUNDRY_WORKERS") {
            match raw.trim().parse::<usize>() {
                Ok(workers) => config.workers = workers,
                Err(err) => warn!(value = %raw, error = %err, "invalid FOUNDRY_WORKERS; using rayon default"),
            }
        }
        config
    }
}
