pub mod fallback;
pub mod schema;
pub mod status;
pub mod store;

pub use fallback::fallback_catalog;
pub use schema::{CatalogDocument, DocumentFormat};
pub use status::{CatalogStatus, CatalogStatusReport};
pub use store::{BlueprintRuntime, CatalogRuntime, CatalogSource, ManufacturerRuntime, PartRuntime};
