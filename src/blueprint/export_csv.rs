//! CSV export of resolved modules, one row per module.

use std::io::Write;

use serde::Serialize;

use crate::blueprint::resolver::ResolvedModule;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    module_id: &'a str,
    blueprint_id: &'a str,
    manufacturer_id: &'a str,
    parts: String,
    damage: f64,
    fire_rate: f64,
    range: f64,
    energy_cost: f64,
    heat_cost: f64,
    power_output: f64,
    heat_capacity: f64,
    heat_dissipation: f64,
    mass: f64,
    drone_capacity: f64,
    attack_family: &'a str,
    damage_type: &'a str,
    delivery: &'a str,
    /// `id=value` pairs joined by `;`, in tag id order.
    tags: String,
    effects: usize,
    digest: String,
}

impl<'a> ExportRow<'a> {
    fn from_module(module: &'a ResolvedModule) -> Self {
        let result = &module.result;
        Self {
            module_id: &module.module_id,
            blueprint_id: &module.blueprint_ref.blueprint_id,
            manufacturer_id: &module.blueprint_ref.manufacturer_id,
            parts: module.part_ids.join(";"),
            damage: result.damage,
            fire_rate: result.fire_rate,
            range: result.range,
            energy_cost: result.energy_cost,
            heat_cost: result.heat_cost,
            power_output: result.power_output,
            heat_capacity: result.heat_capacity,
            heat_dissipation: result.heat_dissipation,
            mass: result.mass,
            drone_capacity: result.drone_capacity,
            attack_family: result.attack_family.map_or("", |family| family.as_str()),
            damage_type: result.damage_type.map_or("", |damage_type| damage_type.as_str()),
            delivery: result.delivery.map_or("", |delivery| delivery.as_str()),
            tags: module
                .outputs
                .tags
                .iter()
                .map(|tag| format!("{}={}", tag.tag_id, tag.value))
                .collect::<Vec<_>>()
                .join(";"),
            effects: module.outputs.effects.len(),
            digest: format!("{:08x}", result.digest),
        }
    }
}

pub fn write_modules_csv<W: Write>(writer: W, modules: &[ResolvedModule]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for module in modules {
        csv_writer.serialize(ExportRow::from_module(module))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::resolver::{resolve_request, ModuleRequest};
    use crate::blueprint::types::{ModuleClass, ModuleSpec};
    use crate::catalog::fallback_catalog;

    #[test]
    fn writes_header_and_one_row_per_module() {
        let catalog = fallback_catalog();
        let modules: Vec<ResolvedModule> = ["laser-s-1", "pd-s-1"]
            .iter()
            .zip([ModuleClass::Laser, ModuleClass::PointDefense])
            .map(|(id, class)| {
                let request = ModuleRequest {
                    spec: ModuleSpec {
                        offense_rating: 2.0,
                        ..ModuleSpec::new(*id, class)
                    },
                    blueprint: None,
                    parts: Vec::new(),
                };
                resolve_request(&request, &[], &catalog)
            })
            .collect();

        let mut buffer = Vec::new();
        write_modules_csv(&mut buffer, &modules).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("module_id,blueprint_id,manufacturer_id,parts,damage"));
        assert!(lines[1].starts_with("laser-s-1,blueprint.laser.prismworks,prismworks,"));
        assert!(lines[2].contains("damage.kinetic=1"));
        assert!(lines[2].ends_with(&format!("{:08x}", modules[1].result.digest)));
    }
}
