//! Parallel resolution of many module instances against one shared catalog.
//!
//! Each resolution only reads the catalog and writes its own outputs, so
//! requests are resolved independently and collected back in input order.

use std::sync::Arc;

use rayon::prelude::*;

use crate::blueprint::{resolve_request, ModuleRequest, ResolvedModule, ResolvedOp};
use crate::catalog::CatalogRuntime;
use crate::parallel::pool::WorkerPool;

/// Fewest requests handed to one rayon task. A single resolution is a few
/// microseconds, so smaller splits cost more in scheduling than they save.
pub const MIN_REQUESTS_PER_TASK: usize = 32;

/// Resolves every request, in parallel, returning results in input order.
/// `run_perks` apply to every module.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use foundry::blueprint::{ModuleClass, ModuleRequest, ModuleSpec};
/// # use foundry::catalog::fallback_catalog;
/// # use foundry::parallel::{resolve_batch, WorkerPool};
/// let catalog = Arc::new(fallback_catalog());
/// let requests = vec![ModuleRequest {
///     spec: ModuleSpec::new("laser-s-1", ModuleClass::Laser),
///     blueprint: None,
///     parts: Vec::new(),
/// }];
/// let resolved = resolve_batch(&requests, &[], &catalog, &WorkerPool::default());
/// assert_eq!(resolved[0].blueprint_ref.blueprint_id, "blueprint.laser.prismworks");
/// ```
pub fn resolve_batch(
    requests: &[ModuleRequest],
    run_perks: &[ResolvedOp],
    catalog: &Arc<CatalogRuntime>,
    pool: &WorkerPool,
) -> Vec<ResolvedModule> {
    pool.install(|| {
        requests
            .par_iter()
            .with_min_len(MIN_REQUESTS_PER_TASK)
            .map(|request| resolve_request(request, run_perks, catalog))
            .collect()
    })
}
