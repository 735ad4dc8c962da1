use serde::{Deserialize, Serialize};

/// Load outcome exposed to calling code so it can surface problems without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub loaded: bool,
    pub has_errors: bool,
    pub catalog_digest: u32,
    pub validation_error_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatusReport {
    pub source: String,
    #[serde(flatten)]
    pub status: CatalogStatus,
    pub manufacturers: usize,
    pub parts: usize,
    pub blueprints: usize,
    pub validation_errors: Vec<String>,
}

impl CatalogStatusReport {
    /// Appends errors discovered outside catalog load (e.g. unknown base modules).
    pub fn extend_errors(&mut self, errors: impl IntoIterator<Item = String>) {
        self.validation_errors.extend(errors);
        self.status.validation_error_count = self.validation_errors.len();
        self.status.has_errors = !self.validation_errors.is_empty();
    }

    pub fn digest_hex(&self) -> String {
        format!("{:08x}", self.status.catalog_digest)
    }
}
