//! Carrier-level roll-ups of per-module reactor and hangar profiles.

use serde::{Deserialize, Serialize};

use crate::blueprint::profile::{HangarProfile, ReactorProfile};
use crate::blueprint::resolver::ResolvedModule;
use crate::blueprint::types::{DamageType, WeaponDelivery, WeaponFamily};

pub const HOT_RESTART_SECONDS: f64 = 2.5;
pub const COLD_RESTART_SECONDS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierReactor {
    pub output_mw: f64,
    pub efficiency: f64,
    pub idle_draw_mw: f64,
    pub hot_restart_seconds: f64,
    pub cold_restart_seconds: f64,
}

/// Sums reactors with positive output. `None` when nothing produces power.
pub fn aggregate_reactors<'a, I>(reactors: I) -> Option<CarrierReactor>
where
    I: IntoIterator<Item = &'a ReactorProfile>,
{
    let mut output = 0.0;
    let mut heat_capacity = 0.0;
    let mut heat_dissipation = 0.0;
    let mut mass = 0.0;

    for reactor in reactors {
        if reactor.power_output_mw <= 0.0 {
            continue;
        }
        output += reactor.power_output_mw;
        heat_capacity += reactor.heat_capacity.max(0.0);
        heat_dissipation += reactor.heat_dissipation.max(0.0);
        mass += reactor.mass_tons.max(0.0);
    }

    if output <= 0.0 {
        return None;
    }

    let efficiency = if heat_capacity > 0.0 {
        (heat_dissipation / heat_capacity).clamp(0.0, 1.0)
    } else {
        0.8
    };

    Some(CarrierReactor {
        output_mw: output,
        efficiency: efficiency.max(0.1),
        idle_draw_mw: (mass * 0.02).max(1.0),
        hot_restart_seconds: HOT_RESTART_SECONDS,
        cold_restart_seconds: COLD_RESTART_SECONDS,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierHangar {
    pub drone_capacity: f64,
    pub drone_attack_family: WeaponFamily,
}

impl CarrierHangar {
    /// Damage type and delivery handed to the carrier's strike craft.
    pub fn drone_weapon(&self) -> (DamageType, WeaponDelivery) {
        match self.drone_attack_family {
            WeaponFamily::Energy => (DamageType::Energy, WeaponDelivery::Beam),
            WeaponFamily::Explosive => (DamageType::Explosive, WeaponDelivery::Guided),
            WeaponFamily::Kinetic => (DamageType::Kinetic, WeaponDelivery::Slug),
        }
    }
}

/// Sums hangar capacity and votes the drone family: Energy wins ties, then
/// Explosive if it beats Kinetic.
pub fn aggregate_hangars<'a, I>(hangars: I) -> Option<CarrierHangar>
where
    I: IntoIterator<Item = &'a HangarProfile>,
{
    let mut capacity = 0.0;
    let (mut energy, mut kinetic, mut explosive) = (0_u32, 0_u32, 0_u32);

    for hangar in hangars {
        if hangar.drone_capacity <= 0.0 {
            continue;
        }
        capacity += hangar.drone_capacity;
        match hangar.drone_attack_family {
            WeaponFamily::Energy => energy += 1,
            WeaponFamily::Kinetic => kinetic += 1,
            WeaponFamily::Explosive => explosive += 1,
        }
    }

    if capacity <= 0.0 {
        return None;
    }

    let family = if energy >= kinetic && energy >= explosive {
        WeaponFamily::Energy
    } else if explosive > kinetic {
        WeaponFamily::Explosive
    } else {
        WeaponFamily::Kinetic
    };

    Some(CarrierHangar {
        drone_capacity: capacity,
        drone_attack_family: family,
    })
}

/// Carrier-wide view of a set of resolved modules. Modules with no power
/// output or no drone capacity simply do not contribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierSummary {
    pub reactor: Option<CarrierReactor>,
    pub hangar: Option<CarrierHangar>,
    pub drone_damage_type: Option<DamageType>,
    pub drone_delivery: Option<WeaponDelivery>,
}

impl CarrierSummary {
    pub fn from_modules(modules: &[ResolvedModule]) -> Self {
        let hangar = aggregate_hangars(modules.iter().map(|module| &module.profiles.hangar));
        let drone_weapon = hangar.as_ref().map(CarrierHangar::drone_weapon);
        Self {
            reactor: aggregate_reactors(modules.iter().map(|module| &module.profiles.reactor)),
            hangar,
            drone_damage_type: drone_weapon.map(|(damage_type, _)| damage_type),
            drone_delivery: drone_weapon.map(|(_, delivery)| delivery),
        }
    }
}
