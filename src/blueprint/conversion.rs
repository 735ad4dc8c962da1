//! Damage conversion, run once after every op layer has been applied.

use serde::{Deserialize, Serialize};

use crate::blueprint::accumulator::{Accumulator, DAMAGE_BUCKETS};
use crate::blueprint::types::DamageType;

/// A registered `from -> to` conversion; `pct` is already clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub from: DamageType,
    pub to: DamageType,
    pub pct: f64,
}

/// Combined share taken from one source by two rules once over-subscription is
/// scaled away. Never exceeds 1.
pub fn scaled_conversion_total(pct_a: f64, pct_b: f64) -> f64 {
    let total = pct_a.max(0.0) + pct_b.max(0.0);
    if total <= 1.0 {
        return total;
    }
    let scale = 1.0 / total;
    pct_a.max(0.0) * scale + pct_b.max(0.0) * scale
}

/// Scales every rule of an over-subscribed source so that source sums to 1.
pub fn scale_rules(rules: &[ConversionRule]) -> Vec<ConversionRule> {
    let mut sum_by_from = [0.0_f64; DAMAGE_BUCKETS];
    for rule in rules {
        sum_by_from[rule.from.bucket_index()] += rule.pct.clamp(0.0, 1.0);
    }

    rules
        .iter()
        .map(|rule| {
            let total = sum_by_from[rule.from.bucket_index()];
            let mut pct = rule.pct.clamp(0.0, 1.0);
            if total > 1.0 {
                pct *= 1.0 / total;
            }
            ConversionRule { pct, ..*rule }
        })
        .collect()
}

/// Brings the buckets in line with the accumulated Damage stat so stat ops on
/// Damage survive conversion. Returns false when there is no damage to route.
fn reconcile_buckets(acc: &mut Accumulator) -> bool {
    let total = acc.bucket_total();
    let damage = acc.damage.max(0.0);
    if total > 0.0 {
        let scale = damage / total;
        for amount in acc.buckets.iter_mut() {
            *amount = amount.max(0.0) * scale;
        }
        return true;
    }
    match acc.damage_type {
        Some(damage_type) => {
            acc.buckets[damage_type.bucket_index()] = damage;
            true
        }
        None => false,
    }
}

/// Bucket with the strictly greatest amount, scanning in declaration order.
pub fn dominant_damage_type(buckets: &[f64; DAMAGE_BUCKETS]) -> Option<DamageType> {
    let mut best = 0.0;
    let mut dominant = None;
    for damage_type in DamageType::ALL {
        let amount = buckets[damage_type.bucket_index()];
        if amount > best {
            best = amount;
            dominant = Some(damage_type);
        }
    }
    dominant
}

/// Applies the registered rules to the accumulator. No-op without rules.
pub fn resolve_conversions(acc: &mut Accumulator, rules: &[ConversionRule]) {
    if rules.is_empty() || !reconcile_buckets(acc) {
        return;
    }

    let scaled = scale_rules(rules);
    let original = acc.buckets;
    let mut next = original;

    for from in DamageType::ALL {
        let from_amount = original[from.bucket_index()];
        if from_amount <= 0.0 {
            continue;
        }

        let mut converted = 0.0;
        for rule in scaled.iter().filter(|rule| rule.from == from) {
            let amount = from_amount * rule.pct;
            converted += amount;
            next[rule.to.bucket_index()] += amount;
        }

        let slot = &mut next[from.bucket_index()];
        *slot = (*slot - from_amount.min(converted)).max(0.0);
    }

    acc.buckets = next;
    acc.damage = acc.bucket_total();
    acc.damage_type = dominant_damage_type(&acc.buckets);
    if !acc.family_explicit {
        if let Some(damage_type) = acc.damage_type {
            acc.attack_family = Some(damage_type.family());
        }
        acc.delivery = acc.attack_family.map(|family| family.delivery());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::types::{ModuleClass, ModuleSpec, WeaponDelivery, WeaponFamily};

    const EPS: f64 = 1e-3;

    fn kinetic(offense: f64) -> Accumulator {
        let spec = ModuleSpec {
            offense_rating: offense,
            ..ModuleSpec::new("kinetic-m-1", ModuleClass::Kinetic)
        };
        Accumulator::seed(&spec)
    }

    fn rule(from: DamageType, to: DamageType, pct: f64) -> ConversionRule {
        ConversionRule { from, to, pct }
    }

    #[test]
    fn oversubscribed_source_is_scaled_to_one() {
        let mut acc = kinetic(10.0);
        resolve_conversions(
            &mut acc,
            &[
                rule(DamageType::Kinetic, DamageType::Explosive, 0.4),
                rule(DamageType::Kinetic, DamageType::EM, 0.8),
            ],
        );
        assert!(acc.bucket(DamageType::Kinetic).abs() < EPS);
        assert!((acc.bucket(DamageType::Explosive) - 100.0 / 3.0).abs() < EPS);
        assert!((acc.bucket(DamageType::EM) - 200.0 / 3.0).abs() < EPS);
        assert!((acc.damage - 100.0).abs() < EPS);
        assert_eq!(acc.damage_type, Some(DamageType::EM));
        assert_eq!(acc.attack_family, Some(WeaponFamily::Energy));
        assert_eq!(acc.delivery, Some(WeaponDelivery::Beam));
    }

    #[test]
    fn partial_conversion_keeps_remainder_in_source() {
        let mut acc = kinetic(10.0);
        resolve_conversions(&mut acc, &[rule(DamageType::Kinetic, DamageType::Thermal, 0.25)]);
        assert!((acc.bucket(DamageType::Kinetic) - 75.0).abs() < EPS);
        assert!((acc.bucket(DamageType::Thermal) - 25.0).abs() < EPS);
        assert_eq!(acc.damage_type, Some(DamageType::Kinetic));
        assert_eq!(acc.attack_family, Some(WeaponFamily::Kinetic));
    }

    #[test]
    fn explicit_family_is_not_rederived() {
        let mut acc = kinetic(10.0);
        acc.family_explicit = true;
        resolve_conversions(&mut acc, &[rule(DamageType::Kinetic, DamageType::EM, 1.0)]);
        assert_eq!(acc.damage_type, Some(DamageType::EM));
        assert_eq!(acc.attack_family, Some(WeaponFamily::Kinetic));
        assert_eq!(acc.delivery, Some(WeaponDelivery::Slug));
    }

    #[test]
    fn accumulated_damage_is_reconciled_before_converting() {
        let mut acc = kinetic(10.0);
        acc.mul_stat(crate::blueprint::types::StatId::Damage, 1.5);
        resolve_conversions(&mut acc, &[rule(DamageType::Kinetic, DamageType::Caustic, 1.0)]);
        assert!((acc.damage - 150.0).abs() < EPS);
        assert!((acc.bucket(DamageType::Caustic) - 150.0).abs() < EPS);
    }

    #[test]
    fn no_rules_leaves_accumulator_untouched() {
        let mut acc = kinetic(3.0);
        acc.add_stat(crate::blueprint::types::StatId::Damage, 7.0);
        let before = acc.clone();
        resolve_conversions(&mut acc, &[]);
        assert_eq!(acc, before);
    }

    #[test]
    fn ties_keep_the_earlier_damage_type() {
        let mut buckets = [0.0; DAMAGE_BUCKETS];
        buckets[DamageType::Kinetic.bucket_index()] = 10.0;
        buckets[DamageType::Thermal.bucket_index()] = 10.0;
        assert_eq!(dominant_damage_type(&buckets), Some(DamageType::Thermal));
        assert_eq!(dominant_damage_type(&[0.0; DAMAGE_BUCKETS]), None);
    }

    #[test]
    fn scaled_total_never_exceeds_one() {
        assert!((scaled_conversion_total(0.4, 0.8) - 1.0).abs() < 1e-9);
        assert!((scaled_conversion_total(0.2, 0.3) - 0.5).abs() < 1e-9);
        assert_eq!(scaled_conversion_total(-1.0, 0.0), 0.0);
    }
}
