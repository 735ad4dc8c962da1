//! Default blueprint selection for modules that arrive without a reference.

use serde::{Deserialize, Serialize};

use crate::blueprint::types::{BlueprintRef, ModuleSpec};
use crate::catalog::CatalogRuntime;
use crate::hash::{stable_str_hash, Fnv1a};

pub const DEFAULT_MANUFACTURER_ID: &str = "baseline";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub blueprint_ref: BlueprintRef,
    pub part_ids: Vec<String>,
}

/// Caller-side reference hash for a (manufacturer, blueprint) pair.
pub fn blueprint_ref_hash(manufacturer_id: &str, blueprint_id: &str) -> u32 {
    let mut hash = Fnv1a::new();
    hash.append_u32(stable_str_hash(manufacturer_id));
    hash.append_u32(stable_str_hash(blueprint_id));
    hash.finish()
}

/// Picks the first blueprint (by id) built on `spec.id`. The manufacturer is
/// the blueprint's, else the module's, else `baseline`; one the catalog does not
/// know is replaced by `baseline` too.
pub fn auto_assign(spec: &ModuleSpec, catalog: &CatalogRuntime) -> Assignment {
    let chosen = catalog
        .blueprints_for_base_module(&spec.id)
        .into_iter()
        .next();

    let mut manufacturer_id = chosen
        .map(|blueprint| blueprint.manufacturer_id.as_str())
        .unwrap_or_default();
    if manufacturer_id.is_empty() {
        manufacturer_id = spec.manufacturer_id.trim();
    }
    if manufacturer_id.is_empty() || catalog.manufacturer(manufacturer_id).is_none() {
        manufacturer_id = DEFAULT_MANUFACTURER_ID;
    }

    let blueprint_id = chosen.map(|blueprint| blueprint.id.clone()).unwrap_or_default();
    let part_ids = chosen
        .map(|blueprint| {
            blueprint
                .part_ids
                .iter()
                .filter(|id| catalog.part(id).is_some())
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Assignment {
        blueprint_ref: BlueprintRef {
            manufacturer_id: manufacturer_id.to_string(),
            stable_hash: blueprint_ref_hash(manufacturer_id, &blueprint_id),
            blueprint_id,
        },
        part_ids,
    }
}
