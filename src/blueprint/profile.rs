//! Downstream views of a [ResolveResult]: the flat stat list plus the weapon,
//! reactor and hangar profiles consumed by combat and carrier systems.

use serde::{Deserialize, Serialize};

use crate::blueprint::accumulator::seed_damage;
use crate::blueprint::resolver::{DerivedStat, ResolveResult};
use crate::blueprint::types::{DamageType, ModuleSpec, StatId, WeaponDelivery, WeaponFamily};

pub fn derived_stats(result: &ResolveResult) -> Vec<DerivedStat> {
    [
        (StatId::Damage, result.damage),
        (StatId::FireRate, result.fire_rate),
        (StatId::Range, result.range),
        (StatId::EnergyCost, result.energy_cost),
        (StatId::HeatCost, result.heat_cost),
        (StatId::PowerOutput, result.power_output),
        (StatId::HeatCapacity, result.heat_capacity),
        (StatId::HeatDissipation, result.heat_dissipation),
        (StatId::Mass, result.mass),
        (StatId::DroneCapacity, result.drone_capacity),
    ]
    .into_iter()
    .map(|(stat, value)| DerivedStat { stat, value })
    .collect()
}

/// Resolved weapon numbers relative to the unmodified archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub damage_scalar: f64,
    pub fire_rate_scalar: f64,
    pub range_scalar: f64,
    pub energy_cost_scalar: f64,
    pub heat_cost_scalar: f64,
    pub attack_family: Option<WeaponFamily>,
    pub damage_type: Option<DamageType>,
    pub delivery: Option<WeaponDelivery>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactorProfile {
    pub power_output_mw: f64,
    pub heat_capacity: f64,
    pub heat_dissipation: f64,
    pub mass_tons: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HangarProfile {
    pub drone_capacity: f64,
    pub drone_attack_family: WeaponFamily,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleProfiles {
    pub weapon: WeaponProfile,
    pub reactor: ReactorProfile,
    pub hangar: HangarProfile,
}

impl ModuleProfiles {
    pub fn derive(spec: &ModuleSpec, result: &ResolveResult) -> Self {
        let base_energy = spec.power_draw_mw.max(0.0).max(0.01);
        Self {
            weapon: WeaponProfile {
                damage_scalar: result.damage / seed_damage(spec),
                fire_rate_scalar: result.fire_rate,
                range_scalar: result.range,
                energy_cost_scalar: result.energy_cost / base_energy,
                heat_cost_scalar: result.heat_cost,
                attack_family: result.attack_family,
                damage_type: result.damage_type,
                delivery: result.delivery,
            },
            reactor: ReactorProfile {
                power_output_mw: result.power_output,
                heat_capacity: result.heat_capacity,
                heat_dissipation: result.heat_dissipation,
                mass_tons: result.mass,
            },
            hangar: HangarProfile {
                drone_capacity: result.drone_capacity,
                drone_attack_family: result.attack_family.unwrap_or(WeaponFamily::Kinetic),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::types::ModuleClass;

    fn result(damage: f64, energy_cost: f64, family: Option<WeaponFamily>) -> ResolveResult {
        ResolveResult {
            damage,
            fire_rate: 1.2,
            range: 1.1,
            energy_cost,
            heat_cost: 0.85,
            power_output: 0.0,
            heat_capacity: 8.0,
            heat_dissipation: 6.0,
            mass: 3.0,
            drone_capacity: 0.0,
            attack_family: family,
            damage_type: None,
            delivery: None,
            digest: 0,
        }
    }

    #[test]
    fn weapon_scalars_are_relative_to_seed() {
        let spec = ModuleSpec {
            offense_rating: 5.0,
            power_draw_mw: 4.0,
            ..ModuleSpec::new("laser-s-1", ModuleClass::Laser)
        };
        let profiles = ModuleProfiles::derive(&spec, &result(57.5, 6.0, Some(WeaponFamily::Energy)));
        assert!((profiles.weapon.damage_scalar - 1.15).abs() < 1e-9);
        assert!((profiles.weapon.energy_cost_scalar - 1.5).abs() < 1e-9);
        assert_eq!(profiles.weapon.heat_cost_scalar, 0.85);
    }

    #[test]
    fn zero_power_draw_uses_floor_baseline() {
        let spec = ModuleSpec::new("armor-s-1", ModuleClass::Armor);
        let profiles = ModuleProfiles::derive(&spec, &result(1.0, 0.02, None));
        assert!((profiles.weapon.energy_cost_scalar - 2.0).abs() < 1e-9);
        assert_eq!(profiles.hangar.drone_attack_family, WeaponFamily::Kinetic);
    }

    #[test]
    fn stat_list_follows_stat_order() {
        let stats = derived_stats(&result(10.0, 1.0, None));
        assert_eq!(stats.len(), 10);
        assert_eq!(stats[0].stat, StatId::Damage);
        assert_eq!(stats[9].stat, StatId::DroneCapacity);
        assert_eq!(stats[8].value, 3.0);
    }
}
