//! Canonical digest over a resolved module.
//!
//! Numeric fields are quantized before hashing; tags and effect records are
//! sorted first, so only their content (never their construction order) counts.

use std::cmp::Ordering;

use crate::blueprint::apply::DerivedEffectOp;
use crate::blueprint::resolver::{DerivedTag, ResolveResult};
use crate::blueprint::types::{damage_type_ordinal, delivery_ordinal, family_ordinal, BlueprintRef};
use crate::catalog::PartRuntime;
use crate::hash::Fnv1a;

pub fn compute_digest(
    module_id: &str,
    blueprint_ref: &BlueprintRef,
    sorted_parts: &[&PartRuntime],
    result: &ResolveResult,
    tags: &[DerivedTag],
    effects: &[DerivedEffectOp],
) -> u32 {
    let mut hash = Fnv1a::new();
    hash.append_str(module_id);
    hash.append_str(&blueprint_ref.manufacturer_id);
    hash.append_str(&blueprint_ref.blueprint_id);
    hash.append_u32(blueprint_ref.stable_hash);

    for part in sorted_parts {
        hash.append_str(&part.slot_type);
        hash.append_str(&part.id);
    }

    for value in [
        result.damage,
        result.fire_rate,
        result.range,
        result.energy_cost,
        result.heat_cost,
        result.power_output,
        result.heat_capacity,
        result.heat_dissipation,
        result.mass,
        result.drone_capacity,
    ] {
        hash.append_quantized(value);
    }
    hash.append_i32(family_ordinal(result.attack_family));
    hash.append_i32(damage_type_ordinal(result.damage_type));
    hash.append_i32(delivery_ordinal(result.delivery));

    let mut sorted_tags: Vec<&DerivedTag> = tags.iter().collect();
    sorted_tags.sort_by(|a, b| a.tag_id.cmp(&b.tag_id));
    for tag in sorted_tags {
        hash.append_str(&tag.tag_id);
        hash.append_quantized(tag.value);
    }

    let mut sorted_effects: Vec<&DerivedEffectOp> = effects.iter().collect();
    sorted_effects.sort_by(|a, b| compare_effects(a, b));
    for effect in sorted_effects {
        hash.append_i32(effect.kind.ordinal());
        hash.append_str(&effect.effect_id);
        hash.append_quantized(effect.chance);
        hash.append_quantized(effect.proc_coefficient);
        hash.append_i32(damage_type_ordinal(effect.from_damage_type));
        hash.append_i32(damage_type_ordinal(effect.to_damage_type));
        hash.append_quantized(effect.conversion_pct);
        hash.append_i32(family_ordinal(effect.from_family));
        hash.append_i32(family_ordinal(effect.to_family));
    }

    hash.finish()
}

/// Orders by (kind, effect id); the remaining fields break ties so records
/// sharing a key still hash identically whatever order they were pushed in.
fn compare_effects(a: &DerivedEffectOp, b: &DerivedEffectOp) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| a.effect_id.cmp(&b.effect_id))
        .then_with(|| a.chance.total_cmp(&b.chance))
        .then_with(|| a.proc_coefficient.total_cmp(&b.proc_coefficient))
        .then_with(|| damage_type_ordinal(a.from_damage_type).cmp(&damage_type_ordinal(b.from_damage_type)))
        .then_with(|| damage_type_ordinal(a.to_damage_type).cmp(&damage_type_ordinal(b.to_damage_type)))
        .then_with(|| a.conversion_pct.total_cmp(&b.conversion_pct))
        .then_with(|| family_ordinal(a.from_family).cmp(&family_ordinal(b.from_family)))
        .then_with(|| family_ordinal(a.to_family).cmp(&family_ordinal(b.to_family)))
}
