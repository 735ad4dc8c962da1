//! Closed vocabularies for module blueprints and the immutable module records they act on.
//!
//! Ordinals are explicit and stable: they are folded into digests, so reordering
//! variants would change every digest. "Unset" values are `None` and hash as 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleClass {
    Reactor = 0,
    Engine = 1,
    Laser = 2,
    Kinetic = 3,
    Missile = 4,
    PointDefense = 5,
    Shield = 6,
    Armor = 7,
    Hangar = 8,
    RepairDrones = 9,
    Scanner = 10,
    Cargo = 11,
    Tractor = 12,
    Bridge = 13,
    Cockpit = 14,
    Ammunition = 15,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MountSize {
    #[default]
    S = 0,
    M = 1,
    L = 2,
}

impl MountSize {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatId {
    Damage = 0,
    FireRate = 1,
    Range = 2,
    EnergyCost = 3,
    HeatCost = 4,
    PowerOutput = 5,
    HeatCapacity = 6,
    HeatDissipation = 7,
    Thrust = 8,
    ShieldCapacity = 9,
    SensorRange = 10,
    Mass = 11,
    DroneCapacity = 12,
}

impl StatId {
    /// Exact, case-sensitive match against the catalog vocabulary.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Damage" => Some(Self::Damage),
            "FireRate" => Some(Self::FireRate),
            "Range" => Some(Self::Range),
            "EnergyCost" => Some(Self::EnergyCost),
            "HeatCost" => Some(Self::HeatCost),
            "PowerOutput" => Some(Self::PowerOutput),
            "HeatCapacity" => Some(Self::HeatCapacity),
            "HeatDissipation" => Some(Self::HeatDissipation),
            "Thrust" => Some(Self::Thrust),
            "ShieldCapacity" => Some(Self::ShieldCapacity),
            "SensorRange" => Some(Self::SensorRange),
            "Mass" => Some(Self::Mass),
            "DroneCapacity" => Some(Self::DroneCapacity),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Damage => "Damage",
            Self::FireRate => "FireRate",
            Self::Range => "Range",
            Self::EnergyCost => "EnergyCost",
            Self::HeatCost => "HeatCost",
            Self::PowerOutput => "PowerOutput",
            Self::HeatCapacity => "HeatCapacity",
            Self::HeatDissipation => "HeatDissipation",
            Self::Thrust => "Thrust",
            Self::ShieldCapacity => "ShieldCapacity",
            Self::SensorRange => "SensorRange",
            Self::Mass => "Mass",
            Self::DroneCapacity => "DroneCapacity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageType {
    Energy = 1,
    Thermal = 2,
    EM = 3,
    Radiation = 4,
    Kinetic = 5,
    Explosive = 6,
    Caustic = 7,
}

impl DamageType {
    /// Declaration order; dominance ties keep the earlier entry.
    pub const ALL: [DamageType; 7] = [
        Self::Energy,
        Self::Thermal,
        Self::EM,
        Self::Radiation,
        Self::Kinetic,
        Self::Explosive,
        Self::Caustic,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Energy" => Some(Self::Energy),
            "Thermal" => Some(Self::Thermal),
            "EM" => Some(Self::EM),
            "Radiation" => Some(Self::Radiation),
            "Kinetic" => Some(Self::Kinetic),
            "Explosive" => Some(Self::Explosive),
            "Caustic" => Some(Self::Caustic),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Thermal => "Thermal",
            Self::EM => "EM",
            Self::Radiation => "Radiation",
            Self::Kinetic => "Kinetic",
            Self::Explosive => "Explosive",
            Self::Caustic => "Caustic",
        }
    }

    /// Index into a bucket array laid out in [DamageType::ALL] order.
    pub const fn bucket_index(self) -> usize {
        self as usize - 1
    }

    /// Weapon family a damage type naturally belongs to.
    pub const fn family(self) -> WeaponFamily {
        match self {
            Self::Kinetic => WeaponFamily::Kinetic,
            Self::Explosive => WeaponFamily::Explosive,
            Self::Energy | Self::Thermal | Self::EM | Self::Radiation | Self::Caustic => {
                WeaponFamily::Energy
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponFamily {
    Energy = 1,
    Kinetic = 2,
    Explosive = 3,
}

impl WeaponFamily {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Energy" => Some(Self::Energy),
            "Kinetic" => Some(Self::Kinetic),
            "Explosive" => Some(Self::Explosive),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Kinetic => "Kinetic",
            Self::Explosive => "Explosive",
        }
    }

    /// Default delivery mode for a family.
    pub const fn delivery(self) -> WeaponDelivery {
        match self {
            Self::Energy => WeaponDelivery::Beam,
            Self::Kinetic => WeaponDelivery::Slug,
            Self::Explosive => WeaponDelivery::Guided,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponDelivery {
    Beam = 1,
    Slug = 2,
    Guided = 3,
}

impl WeaponDelivery {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beam => "Beam",
            Self::Slug => "Slug",
            Self::Guided => "Guided",
        }
    }
}

/// Kind tag of a [crate::blueprint::ResolvedOp], ordered as it is hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpKind {
    AddStat = 1,
    MulStat = 2,
    AddTag = 3,
    RemoveTag = 4,
    ConvertDamage = 5,
    ReplaceAttackFamily = 6,
    AddProc = 7,
}

impl OpKind {
    pub const fn ordinal(self) -> i32 {
        self as i32
    }
}

/// Ordinal used in digests for optional vocabulary values (unset = 0).
pub fn damage_type_ordinal(value: Option<DamageType>) -> i32 {
    value.map_or(0, |v| v as i32)
}

pub fn family_ordinal(value: Option<WeaponFamily>) -> i32 {
    value.map_or(0, |v| v as i32)
}

pub fn delivery_ordinal(value: Option<WeaponDelivery>) -> i32 {
    value.map_or(0, |v| v as i32)
}

/// Lookup key for ids compared without regard to case (tag ids, slot types).
pub fn fold_key(id: &str) -> String {
    id.to_lowercase()
}

/// Immutable module archetype owned by the host; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub id: String,
    pub class: ModuleClass,
    #[serde(default)]
    pub offense_rating: f64,
    #[serde(default)]
    pub power_draw_mw: f64,
    #[serde(default)]
    pub mass_tons: f64,
    #[serde(default)]
    pub required_size: MountSize,
    /// Hangar capacity, cargo capacity, etc. depending on class.
    #[serde(default)]
    pub function_capacity: f64,
    #[serde(default)]
    pub manufacturer_id: String,
}

impl ModuleSpec {
    pub fn new(id: impl Into<String>, class: ModuleClass) -> Self {
        Self {
            id: id.into(),
            class,
            offense_rating: 0.0,
            power_draw_mw: 0.0,
            mass_tons: 0.0,
            required_size: MountSize::S,
            function_capacity: 0.0,
            manufacturer_id: String::new(),
        }
    }
}

/// Per-instance pointer into the catalog. `stable_hash` is a cheap caller-side
/// reference only; it is hashed into the digest but never used for lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintRef {
    #[serde(default)]
    pub manufacturer_id: String,
    #[serde(default)]
    pub blueprint_id: String,
    #[serde(default)]
    pub stable_hash: u32,
}

impl BlueprintRef {
    pub fn manufacturer(id: impl Into<String>) -> Self {
        Self {
            manufacturer_id: id.into(),
            ..Self::default()
        }
    }

    pub fn blueprint(id: impl Into<String>) -> Self {
        Self {
            blueprint_id: id.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_parsing_is_case_sensitive() {
        assert_eq!(StatId::parse("FireRate"), Some(StatId::FireRate));
        assert_eq!(StatId::parse("firerate"), None);
        assert_eq!(DamageType::parse("EM"), Some(DamageType::EM));
        assert_eq!(DamageType::parse("Em"), None);
        assert_eq!(WeaponFamily::parse(" Kinetic "), Some(WeaponFamily::Kinetic));
        assert_eq!(WeaponFamily::parse("Thermal"), None);
    }

    #[test]
    fn bucket_indices_follow_declaration_order() {
        for (index, damage_type) in DamageType::ALL.iter().enumerate() {
            assert_eq!(damage_type.bucket_index(), index);
        }
    }

    #[test]
    fn families_map_to_default_delivery() {
        assert_eq!(WeaponFamily::Energy.delivery(), WeaponDelivery::Beam);
        assert_eq!(WeaponFamily::Kinetic.delivery(), WeaponDelivery::Slug);
        assert_eq!(WeaponFamily::Explosive.delivery(), WeaponDelivery::Guided);
        assert_eq!(DamageType::Caustic.family(), WeaponFamily::Energy);
    }

    #[test]
    fn unset_vocabulary_hashes_as_zero() {
        assert_eq!(damage_type_ordinal(None), 0);
        assert_eq!(family_ordinal(Some(WeaponFamily::Explosive)), 3);
        assert_eq!(delivery_ordinal(Some(WeaponDelivery::Beam)), 1);
    }
}
