//! Working state of a single resolution: numeric stats, per-damage-type buckets,
//! and the current attack family / damage type / delivery.

use crate::blueprint::types::{
    DamageType, ModuleClass, ModuleSpec, StatId, WeaponDelivery, WeaponFamily,
};

pub const DAMAGE_BUCKETS: usize = DamageType::ALL.len();

#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
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
    /// Damage per type, indexed by [DamageType::bucket_index].
    pub buckets: [f64; DAMAGE_BUCKETS],
    /// Set once a ReplaceAttackFamily op fires; suppresses re-deriving the
    /// family from the dominant damage type after conversion.
    pub family_explicit: bool,
}

/// Seed damage before any op: ten per offense point, never below one.
pub fn seed_damage(spec: &ModuleSpec) -> f64 {
    (spec.offense_rating * 10.0).max(1.0)
}

impl Accumulator {
    /// Seeds the accumulator from the module archetype.
    pub fn seed(spec: &ModuleSpec) -> Self {
        let is_reactor = spec.class == ModuleClass::Reactor;
        let size = f64::from(spec.required_size.ordinal());

        let mut acc = Self {
            damage: seed_damage(spec),
            fire_rate: 1.0,
            range: 1.0,
            energy_cost: spec.power_draw_mw.max(0.0),
            heat_cost: 1.0,
            power_output: if is_reactor {
                (-spec.power_draw_mw).max(0.0)
            } else {
                0.0
            },
            heat_capacity: if is_reactor { 100.0 + 40.0 * size } else { 0.0 },
            heat_dissipation: if is_reactor { 5.0 + 3.0 * size } else { 0.0 },
            mass: spec.mass_tons.max(0.1),
            drone_capacity: if spec.class == ModuleClass::Hangar {
                spec.function_capacity.max(1.0)
            } else {
                0.0
            },
            attack_family: None,
            damage_type: None,
            delivery: None,
            buckets: [0.0; DAMAGE_BUCKETS],
            family_explicit: false,
        };

        match spec.class {
            ModuleClass::Laser => acc.seed_weapon(WeaponFamily::Energy, DamageType::Energy, true),
            ModuleClass::Kinetic | ModuleClass::PointDefense => {
                acc.seed_weapon(WeaponFamily::Kinetic, DamageType::Kinetic, true)
            }
            ModuleClass::Missile => {
                acc.seed_weapon(WeaponFamily::Explosive, DamageType::Explosive, true)
            }
            // Drones fight kinetically by default, but the hangar itself deals no damage.
            ModuleClass::Hangar => acc.seed_weapon(WeaponFamily::Kinetic, DamageType::Kinetic, false),
            _ => {}
        }

        acc
    }

    fn seed_weapon(&mut self, family: WeaponFamily, damage_type: DamageType, route_damage: bool) {
        self.attack_family = Some(family);
        self.damage_type = Some(damage_type);
        self.delivery = Some(family.delivery());
        if route_damage {
            self.buckets[damage_type.bucket_index()] = self.damage;
        }
    }

    pub fn bucket(&self, damage_type: DamageType) -> f64 {
        self.buckets[damage_type.bucket_index()]
    }

    /// Field for a stat id. Thrust, ShieldCapacity and SensorRange are part of
    /// the vocabulary but carry no accumulator field.
    fn stat_mut(&mut self, stat: StatId) -> Option<&mut f64> {
        match stat {
            StatId::Damage => Some(&mut self.damage),
            StatId::FireRate => Some(&mut self.fire_rate),
            StatId::Range => Some(&mut self.range),
            StatId::EnergyCost => Some(&mut self.energy_cost),
            StatId::HeatCost => Some(&mut self.heat_cost),
            StatId::PowerOutput => Some(&mut self.power_output),
            StatId::HeatCapacity => Some(&mut self.heat_capacity),
            StatId::HeatDissipation => Some(&mut self.heat_dissipation),
            StatId::Mass => Some(&mut self.mass),
            StatId::DroneCapacity => Some(&mut self.drone_capacity),
            StatId::Thrust | StatId::ShieldCapacity | StatId::SensorRange => None,
        }
    }

    pub fn add_stat(&mut self, stat: StatId, value: f64) {
        if let Some(field) = self.stat_mut(stat) {
            *field += value;
        }
    }

    pub fn mul_stat(&mut self, stat: StatId, value: f64) {
        if let Some(field) = self.stat_mut(stat) {
            *field *= value;
        }
    }

    pub fn bucket_total(&self) -> f64 {
        self.buckets.iter().map(|amount| amount.max(0.0)).sum()
    }
}
