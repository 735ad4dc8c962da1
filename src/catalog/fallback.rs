//! Hand-authored catalog used whenever the configured source is unusable.

use crate::blueprint::ops::ResolvedOp;
use crate::blueprint::types::{fold_key, StatId, WeaponFamily};
use crate::catalog::store::{BlueprintRuntime, CatalogRuntime, ManufacturerRuntime, PartRuntime};

/// A loaded catalog holding only the built-in entries.
pub fn fallback_catalog() -> CatalogRuntime {
    let mut runtime = CatalogRuntime {
        source_label: "builtin".to_string(),
        ..CatalogRuntime::default()
    };
    install_fallback(&mut runtime);
    runtime.finish();
    runtime
}

/// Replaces every table with the built-in entries. Validation errors
/// collected so far are kept.
pub(crate) fn install_fallback(runtime: &mut CatalogRuntime) {
    runtime.slot_allow_multiple.clear();
    runtime.manufacturers.clear();
    runtime.parts.clear();
    runtime.blueprints.clear();
    runtime.blueprints_by_base_module.clear();

    for (slot, allow_multiple) in [
        ("Core", false),
        ("Output", false),
        ("Cooling", false),
        ("Guidance", false),
        ("Utility", true),
    ] {
        runtime
            .slot_allow_multiple
            .insert(fold_key(slot), allow_multiple);
    }

    add_manufacturer(
        runtime,
        "baseline",
        "Baseline Foundry",
        vec![ResolvedOp::add_tag("manufacturer.baseline", 1.0)],
    );
    add_manufacturer(
        runtime,
        "prismworks",
        "Prismworks",
        vec![
            ResolvedOp::mul_stat(StatId::Damage, 1.08),
            ResolvedOp::mul_stat(StatId::Range, 1.1),
            ResolvedOp::add_tag("manufacturer.prismworks", 1.0),
        ],
    );

    add_part(runtime, "core_a", "Core", vec![ResolvedOp::add_stat(StatId::HeatCapacity, 8.0)]);
    add_part(runtime, "core_b", "Core", vec![ResolvedOp::add_stat(StatId::Damage, 2.0)]);
    add_part(
        runtime,
        "lens_beam_bias",
        "Output",
        vec![
            ResolvedOp::mul_stat(StatId::Damage, 1.15),
            ResolvedOp::replace_family(None, WeaponFamily::Energy),
            ResolvedOp::add_tag("attack.beam", 1.0),
        ],
    );
    add_part(
        runtime,
        "barrel_kinetic_bias",
        "Output",
        vec![
            ResolvedOp::mul_stat(StatId::Damage, 1.1),
            ResolvedOp::add_tag("damage.kinetic", 1.0),
        ],
    );
    add_part(
        runtime,
        "cooling_stable",
        "Cooling",
        vec![
            ResolvedOp::mul_stat(StatId::HeatCost, 0.85),
            ResolvedOp::add_stat(StatId::HeatDissipation, 6.0),
        ],
    );
    add_part(
        runtime,
        "guidance_drone_link",
        "Guidance",
        vec![
            ResolvedOp::add_stat(StatId::DroneCapacity, 2.0),
            ResolvedOp::replace_family(None, WeaponFamily::Energy),
            ResolvedOp::add_tag("drone.linked", 1.0),
        ],
    );

    add_blueprint(
        runtime,
        "blueprint.laser.prismworks",
        "laser-s-1",
        "prismworks",
        &["core_a", "lens_beam_bias", "cooling_stable"],
    );
    add_blueprint(
        runtime,
        "blueprint.kinetic.baseline",
        "pd-s-1",
        "baseline",
        &["core_b", "barrel_kinetic_bias", "cooling_stable"],
    );
    add_blueprint(
        runtime,
        "blueprint.hangar.prismworks",
        "hangar-s-1",
        "prismworks",
        &["core_a", "guidance_drone_link", "cooling_stable"],
    );
}

fn add_manufacturer(runtime: &mut CatalogRuntime, id: &str, display_name: &str, ops: Vec<ResolvedOp>) {
    runtime.manufacturers.insert(
        id.to_string(),
        ManufacturerRuntime {
            id: id.to_string(),
            display_name: display_name.to_string(),
            signature_rule_id: String::new(),
            ops,
        },
    );
}

fn add_part(runtime: &mut CatalogRuntime, id: &str, slot_type: &str, ops: Vec<ResolvedOp>) {
    runtime.parts.insert(
        id.to_string(),
        PartRuntime {
            id: id.to_string(),
            slot_type: slot_type.to_string(),
            ops,
        },
    );
}

fn add_blueprint(
    runtime: &mut CatalogRuntime,
    id: &str,
    base_module_id: &str,
    manufacturer_id: &str,
    parts: &[&str],
) {
    runtime.blueprints.insert(
        id.to_string(),
        BlueprintRuntime {
            id: id.to_string(),
            base_module_id: base_module_id.to_string(),
            manufacturer_id: manufacturer_id.to_string(),
            part_ids: parts.iter().map(|part| part.to_string()).collect(),
            rarity: String::new(),
            tier: 0,
            slot_conflicts: Vec::new(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_references_resolve() {
        let catalog = fallback_catalog();
        assert!(catalog.validation_errors().is_empty());
        for blueprint in catalog.blueprints() {
            assert!(catalog.manufacturer(&blueprint.manufacturer_id).is_some());
            for part_id in &blueprint.part_ids {
                assert!(catalog.part(part_id).is_some(), "{part_id}");
            }
        }
        assert!(catalog.slot_allows_multiple("Utility"));
        assert!(!catalog.slot_allows_multiple("Core"));
    }

    #[test]
    fn fallback_index_covers_each_base_module() {
        let catalog = fallback_catalog();
        for base in ["laser-s-1", "pd-s-1", "hangar-s-1"] {
            assert_eq!(catalog.blueprints_for_base_module(base).len(), 1, "{base}");
        }
        assert!(catalog.blueprints_for_base_module("missile-s-1").is_empty());
    }
}
