//! Resolution facade: seed, manufacturer ops, sorted part ops, run perks,
//! conversion, then tags/effects and the digest.

use serde::{Deserialize, Serialize};

use crate::blueprint::accumulator::Accumulator;
use crate::blueprint::apply::{apply_ops, DerivedEffectOp, OpContext};
use crate::blueprint::assign::{auto_assign, Assignment};
use crate::blueprint::conversion::resolve_conversions;
use crate::blueprint::digest::compute_digest;
use crate::blueprint::ops::ResolvedOp;
use crate::blueprint::profile::{derived_stats, ModuleProfiles};
use crate::blueprint::types::{
    fold_key, BlueprintRef, DamageType, ModuleSpec, StatId, WeaponDelivery, WeaponFamily,
};
use crate::catalog::{CatalogRuntime, ManufacturerRuntime, PartRuntime};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTag {
    pub tag_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStat {
    pub stat: StatId,
    pub value: f64,
}

/// Caller-owned per-instance buffers. Cleared and rebuilt by every [resolve].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleOutputs {
    /// Sorted by tag id ignoring case; no two ids differ only in case.
    pub tags: Vec<DerivedTag>,
    /// Application order; duplicates are kept.
    pub effects: Vec<DerivedEffectOp>,
    pub stats: Vec<DerivedStat>,
}

impl ModuleOutputs {
    pub fn clear(&mut self) {
        self.tags.clear();
        self.effects.clear();
        self.stats.clear();
    }

    /// Tag value looked up without regard to case.
    pub fn tag(&self, tag_id: &str) -> Option<f64> {
        let key = fold_key(tag_id);
        self.tags
            .iter()
            .find(|tag| fold_key(&tag.tag_id) == key)
            .map(|tag| tag.value)
    }

    pub fn stat(&self, stat: StatId) -> Option<f64> {
        self.stats
            .iter()
            .find(|entry| entry.stat == stat)
            .map(|entry| entry.value)
    }
}

/// Final numeric profile of one module instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub damage: f64,
    pub fire_rate: f64,
    pub range: f64,
    pub energy_cost: f64,
    pub heat_cost: f64,
    pub power_output: f64,
    pub heat_capacity: f64,
    pub heat_dissipation: f64,
    pub mass: f64,
    pub drone_capacity: f64,
    pub attack_family: Option<WeaponFamily>,
    pub damage_type: Option<DamageType>,
    pub delivery: Option<WeaponDelivery>,
    pub digest: u32,
}

impl ResolveResult {
    fn from_accumulator(acc: &Accumulator) -> Self {
        Self {
            damage: acc.damage.max(0.01),
            fire_rate: acc.fire_rate.max(0.01),
            range: acc.range.max(0.1),
            energy_cost: acc.energy_cost.max(0.0),
            heat_cost: acc.heat_cost.max(0.0),
            power_output: acc.power_output.max(0.0),
            heat_capacity: acc.heat_capacity.max(0.0),
            heat_dissipation: acc.heat_dissipation.max(0.0),
            mass: acc.mass.max(0.01),
            drone_capacity: acc.drone_capacity.max(0.0),
            attack_family: acc.attack_family,
            damage_type: acc.damage_type,
            delivery: acc.delivery,
            digest: 0,
        }
    }
}

/// Manufacturer whose ops apply: the explicit reference wins, then the
/// manufacturer of the referenced blueprint. Neither resolving is not an error.
fn resolve_manufacturer<'a>(
    blueprint_ref: &BlueprintRef,
    catalog: &'a CatalogRuntime,
) -> Option<&'a ManufacturerRuntime> {
    if !blueprint_ref.manufacturer_id.is_empty() {
        if let Some(manufacturer) = catalog.manufacturer(&blueprint_ref.manufacturer_id) {
            return Some(manufacturer);
        }
    }
    if blueprint_ref.blueprint_id.is_empty() {
        return None;
    }
    catalog
        .blueprint(&blueprint_ref.blueprint_id)
        .and_then(|blueprint| catalog.manufacturer(&blueprint.manufacturer_id))
}

/// Parts that exist in the catalog, ordered by (slot type, id). Unknown ids are
/// dropped silently; a newer catalog may have removed them.
pub fn sorted_parts<'a, S: AsRef<str>>(
    part_ids: &[S],
    catalog: &'a CatalogRuntime,
) -> Vec<&'a PartRuntime> {
    let mut parts: Vec<&PartRuntime> = part_ids
        .iter()
        .filter_map(|id| catalog.part(id.as_ref()))
        .collect();
    parts.sort_by(|a, b| {
        a.slot_type
            .cmp(&b.slot_type)
            .then_with(|| a.id.cmp(&b.id))
    });
    parts
}

/// Resolves one module instance against `catalog`, rebuilding `outputs`.
///
/// Part order in `part_ids` never matters. `run_perks` are applied exactly in
/// the order given.
pub fn resolve<S: AsRef<str>>(
    spec: &ModuleSpec,
    blueprint_ref: &BlueprintRef,
    part_ids: &[S],
    run_perks: &[ResolvedOp],
    catalog: &CatalogRuntime,
    outputs: &mut ModuleOutputs,
) -> ResolveResult {
    outputs.clear();

    let mut acc = Accumulator::seed(spec);
    let mut ctx = OpContext::default();

    if let Some(manufacturer) = resolve_manufacturer(blueprint_ref, catalog) {
        apply_ops(&manufacturer.ops, &mut acc, &mut ctx);
    }

    let parts = sorted_parts(part_ids, catalog);
    for part in &parts {
        apply_ops(&part.ops, &mut acc, &mut ctx);
    }

    apply_ops(run_perks, &mut acc, &mut ctx);

    resolve_conversions(&mut acc, &ctx.conversions);

    let OpContext { tags, effects, .. } = ctx;
    outputs.tags = tags.into_values().collect();
    outputs.effects = effects;

    let mut result = ResolveResult::from_accumulator(&acc);
    result.digest = compute_digest(
        &spec.id,
        blueprint_ref,
        &parts,
        &result,
        &outputs.tags,
        &outputs.effects,
    );
    outputs.stats = derived_stats(&result);
    result
}

/// One module instance to resolve. Without a blueprint reference the module is
/// auto-assigned from the catalog and `parts` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRequest {
    pub spec: ModuleSpec,
    #[serde(default)]
    pub blueprint: Option<BlueprintRef>,
    #[serde(default)]
    pub parts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModule {
    pub module_id: String,
    pub blueprint_ref: BlueprintRef,
    pub part_ids: Vec<String>,
    pub result: ResolveResult,
    pub outputs: ModuleOutputs,
    pub profiles: ModuleProfiles,
}

pub fn resolve_request(
    request: &ModuleRequest,
    run_perks: &[ResolvedOp],
    catalog: &CatalogRuntime,
) -> ResolvedModule {
    let (blueprint_ref, part_ids) = match &request.blueprint {
        Some(blueprint_ref) => (blueprint_ref.clone(), request.parts.clone()),
        None => {
            let Assignment {
                blueprint_ref,
                part_ids,
            } = auto_assign(&request.spec, catalog);
            (blueprint_ref, part_ids)
        }
    };

    let mut outputs = ModuleOutputs::default();
    let result = resolve(
        &request.spec,
        &blueprint_ref,
        &part_ids,
        run_perks,
        catalog,
        &mut outputs,
    );
    ResolvedModule {
        module_id: request.spec.id.clone(),
        profiles: ModuleProfiles::derive(&request.spec, &result),
        blueprint_ref,
        part_ids,
        result,
        outputs,
    }
}
