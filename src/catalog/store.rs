//! Catalog loading, validation and lookup.
//!
//! Loading never fails: unreadable or incomplete sources fall back to the
//! built-in catalog, and every problem is kept as a validation message.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::blueprint::ops::ResolvedOp;
use crate::blueprint::types::{fold_key, DamageType, StatId, WeaponFamily};
use crate::catalog::fallback::install_fallback;
use crate::catalog::schema::{
    parse_document, BlueprintDoc, CatalogDocument, DocumentFormat, EffectOpDoc, ManufacturerDoc,
    PartDoc, StatModDoc, TagOpDoc,
};
use crate::catalog::status::{CatalogStatus, CatalogStatusReport};
use crate::error::{Error, Result};
use crate::hash::Fnv1a;

/// Where a catalog document comes from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Format is chosen from the file extension.
    File(PathBuf),
    Text {
        label: String,
        format: DocumentFormat,
        text: String,
    },
}

impl CatalogSource {
    pub fn json(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            label: label.into(),
            format: DocumentFormat::Json,
            text: text.into(),
        }
    }

    pub fn yaml(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            label: label.into(),
            format: DocumentFormat::Yaml,
            text: text.into(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Text { label, .. } => label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturerRuntime {
    pub id: String,
    pub display_name: String,
    pub signature_rule_id: String,
    pub ops: Vec<ResolvedOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartRuntime {
    pub id: String,
    pub slot_type: String,
    pub ops: Vec<ResolvedOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintRuntime {
    pub id: String,
    pub base_module_id: String,
    pub manufacturer_id: String,
    pub part_ids: Vec<String>,
    pub rarity: String,
    pub tier: i32,
    /// Slot types used more than once without `allowMultiple`.
    pub slot_conflicts: Vec<String>,
}

impl BlueprintRuntime {
    pub fn is_flagged(&self) -> bool {
        !self.slot_conflicts.is_empty()
    }
}

/// Immutable once loaded; share it behind an `Arc` for parallel resolution.
#[derive(Debug, Clone, Default)]
pub struct CatalogRuntime {
    /// Keyed by [fold_key] of the slot type.
    pub(crate) slot_allow_multiple: BTreeMap<String, bool>,
    pub(crate) manufacturers: BTreeMap<String, ManufacturerRuntime>,
    pub(crate) parts: BTreeMap<String, PartRuntime>,
    pub(crate) blueprints: BTreeMap<String, BlueprintRuntime>,
    pub(crate) blueprints_by_base_module: BTreeMap<String, Vec<String>>,
    pub(crate) validation_errors: Vec<String>,
    pub(crate) catalog_digest: u32,
    pub(crate) loaded: bool,
    pub(crate) source_label: String,
}

fn read_catalog_document(source: &CatalogSource) -> Result<CatalogDocument> {
    let (label, format, text) = match source {
        CatalogSource::File(path) => {
            if !path.exists() {
                return Err(Error::CatalogMissing { path: path.clone() });
            }
            let text = fs::read_to_string(path)?;
            (source.label(), DocumentFormat::from_path(path), text)
        }
        CatalogSource::Text {
            label,
            format,
            text,
        } => (label.clone(), *format, text.clone()),
    };

    if text.trim().is_empty() {
        return Err(Error::CatalogEmpty { source_name: label });
    }
    parse_document(&text, format, &label)
}

/// Stat op names are matched without regard to case.
fn parse_stat_op(raw: &str, stat: StatId, value: f64) -> Option<ResolvedOp> {
    if raw.eq_ignore_ascii_case("Add") || raw.eq_ignore_ascii_case("AddStat") {
        Some(ResolvedOp::add_stat(stat, value))
    } else if raw.eq_ignore_ascii_case("Mul") || raw.eq_ignore_ascii_case("MulStat") {
        Some(ResolvedOp::mul_stat(stat, value))
    } else {
        None
    }
}

fn parse_tag_op(raw: &str, tag: &str, value: f64) -> Option<ResolvedOp> {
    if raw.eq_ignore_ascii_case("Add") || raw.eq_ignore_ascii_case("AddTag") {
        let value = if value == 0.0 { 1.0 } else { value };
        Some(ResolvedOp::add_tag(tag, value))
    } else if raw.eq_ignore_ascii_case("Remove") || raw.eq_ignore_ascii_case("RemoveTag") {
        Some(ResolvedOp::remove_tag(tag))
    } else {
        None
    }
}

impl CatalogRuntime {
    /// Loads and validates a catalog. Always returns a usable catalog.
    pub fn load(source: &CatalogSource) -> Self {
        let mut runtime = Self {
            source_label: source.label(),
            ..Self::default()
        };

        match read_catalog_document(source) {
            Ok(document) => runtime.populate(&document),
            Err(err) => {
                warn!(source = %runtime.source_label, error = %err, "module blueprint catalog unusable; using builtin fallback");
                runtime.validation_errors.push(err.to_string());
                install_fallback(&mut runtime);
            }
        }

        if runtime.manufacturers.is_empty() || runtime.parts.is_empty() || runtime.blueprints.is_empty() {
            warn!(
                source = %runtime.source_label,
                manufacturers = runtime.manufacturers.len(),
                parts = runtime.parts.len(),
                blueprints = runtime.blueprints.len(),
                "module blueprint catalog incomplete; using builtin fallback"
            );
            runtime
                .validation_errors
                .push("module blueprint catalog incomplete; using builtin fallback".to_string());
            install_fallback(&mut runtime);
        }

        runtime.finish();

        for message in &runtime.validation_errors {
            debug!(source = %runtime.source_label, %message, "catalog validation error");
        }
        info!(
            source = %runtime.source_label,
            manufacturers = runtime.manufacturers.len(),
            parts = runtime.parts.len(),
            blueprints = runtime.blueprints.len(),
            errors = runtime.validation_errors.len(),
            digest = %format!("{:08x}", runtime.catalog_digest),
            "module blueprint catalog loaded"
        );
        runtime
    }

    fn populate(&mut self, document: &CatalogDocument) {
        for slot in &document.slot_types {
            let slot_type = slot.slot_type.trim();
            if slot_type.is_empty() {
                continue;
            }
            self.slot_allow_multiple
                .insert(fold_key(slot_type), slot.allow_multiple);
        }

        for (index, item) in document.manufacturers.iter().enumerate() {
            self.add_manufacturer(index, item);
        }
        for (index, item) in document.parts.iter().enumerate() {
            self.add_part(index, item);
        }
        for (index, item) in document.blueprints.iter().enumerate() {
            self.add_blueprint(index, item);
        }
    }

    fn error(&mut self, message: String) {
        self.validation_errors.push(message);
    }

    fn add_manufacturer(&mut self, index: usize, item: &ManufacturerDoc) {
        let id = item.id.trim();
        if id.is_empty() {
            self.error(format!("manufacturer[{index}] missing id"));
            return;
        }
        if self.manufacturers.contains_key(id) {
            self.error(format!("duplicate manufacturer id '{id}'"));
            return;
        }

        let owner = format!("manufacturer '{id}'");
        let mut ops = Vec::new();
        self.collect_stat_ops(&item.stat_mods, &mut ops, &owner);
        self.collect_tag_ops(&item.tag_ops, &mut ops, &owner);

        self.manufacturers.insert(
            id.to_string(),
            ManufacturerRuntime {
                id: id.to_string(),
                display_name: item.display_name.clone(),
                signature_rule_id: item.signature_rule_id.clone(),
                ops,
            },
        );
    }

    fn add_part(&mut self, index: usize, item: &PartDoc) {
        let id = item.id.trim();
        if id.is_empty() {
            self.error(format!("part[{index}] missing id"));
            return;
        }
        if self.parts.contains_key(id) {
            self.error(format!("duplicate part id '{id}'"));
            return;
        }
        let slot_type = item.slot_type.trim();
        if slot_type.is_empty() {
            self.error(format!("part '{id}' missing slotType"));
            return;
        }

        let owner = format!("part '{id}'");
        let mut ops = Vec::new();
        self.collect_stat_ops(&item.stat_mods, &mut ops, &owner);
        self.collect_tag_ops(&item.tag_ops, &mut ops, &owner);
        self.collect_effect_ops(&item.effect_ops, &mut ops, &owner);

        self.parts.insert(
            id.to_string(),
            PartRuntime {
                id: id.to_string(),
                slot_type: slot_type.to_string(),
                ops,
            },
        );
    }

    fn add_blueprint(&mut self, index: usize, item: &BlueprintDoc) {
        let id = item.blueprint_id.trim();
        if id.is_empty() {
            self.error(format!("blueprint[{index}] missing blueprintId"));
            return;
        }
        if self.blueprints.contains_key(id) {
            self.error(format!("duplicate blueprintId '{id}'"));
            return;
        }
        let base_module_id = item.base_module_id.trim();
        if base_module_id.is_empty() {
            self.error(format!("blueprint '{id}' missing baseModuleId"));
            return;
        }
        let manufacturer_id = item.manufacturer_id.trim();
        if manufacturer_id.is_empty() {
            self.error(format!("blueprint '{id}' missing manufacturerId"));
            return;
        }

        let mut dangling = false;
        if !self.manufacturers.contains_key(manufacturer_id) {
            self.error(format!(
                "blueprint '{id}' references missing manufacturer '{manufacturer_id}'"
            ));
            dangling = true;
        }

        let mut part_ids = Vec::with_capacity(item.parts.len());
        // Folded slot type -> (first spelling seen, count).
        let mut slot_counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
        for raw in &item.parts {
            let part_id = raw.trim();
            if part_id.is_empty() {
                continue;
            }
            match self.parts.get(part_id) {
                Some(part) => {
                    slot_counts
                        .entry(fold_key(&part.slot_type))
                        .or_insert_with(|| (part.slot_type.clone(), 0))
                        .1 += 1;
                    part_ids.push(part_id.to_string());
                }
                None => {
                    self.error(format!("blueprint '{id}' references missing part '{part_id}'"));
                    dangling = true;
                }
            }
        }

        let mut slot_conflicts = Vec::new();
        for (slot_type, count) in slot_counts.into_values() {
            if count > 1 && !self.slot_allows_multiple(&slot_type) {
                self.error(format!(
                    "blueprint '{id}' has duplicate slotType '{slot_type}' without allowMultiple"
                ));
                slot_conflicts.push(slot_type);
            }
        }

        if dangling {
            return;
        }

        self.blueprints.insert(
            id.to_string(),
            BlueprintRuntime {
                id: id.to_string(),
                base_module_id: base_module_id.to_string(),
                manufacturer_id: manufacturer_id.to_string(),
                part_ids,
                rarity: item.rarity.clone(),
                tier: item.tier,
                slot_conflicts,
            },
        );
    }

    fn collect_stat_ops(&mut self, source: &[StatModDoc], target: &mut Vec<ResolvedOp>, owner: &str) {
        for (index, item) in source.iter().enumerate() {
            let Some(stat) = StatId::parse(&item.stat_id) else {
                self.error(format!("{owner} statMods[{index}] unknown statId '{}'", item.stat_id));
                continue;
            };
            let op_id = item.op.trim();
            match parse_stat_op(op_id, stat, item.value) {
                Some(op) => target.push(op),
                None => self.error(format!("{owner} statMods[{index}] unknown op '{op_id}'")),
            }
        }
    }

    fn collect_tag_ops(&mut self, source: &[TagOpDoc], target: &mut Vec<ResolvedOp>, owner: &str) {
        for (index, item) in source.iter().enumerate() {
            if item.tag_id.is_empty() {
                self.error(format!("{owner} tagOps[{index}] missing tagId"));
                continue;
            }
            let op_id = item.op.trim();
            match parse_tag_op(op_id, &item.tag_id, item.value) {
                Some(op) => target.push(op),
                None => self.error(format!("{owner} tagOps[{index}] unknown op '{op_id}'")),
            }
        }
    }

    fn collect_effect_ops(&mut self, source: &[EffectOpDoc], target: &mut Vec<ResolvedOp>, owner: &str) {
        for (index, item) in source.iter().enumerate() {
            let op_id = item.op.trim();
            if op_id.eq_ignore_ascii_case("ConvertDamage") {
                match (
                    DamageType::parse(&item.from_damage_type),
                    DamageType::parse(&item.to_damage_type),
                ) {
                    (Some(from), Some(to)) => target.push(ResolvedOp::convert_damage(
                        from,
                        to,
                        item.pct.clamp(0.0, 1.0),
                    )),
                    _ => self.error(format!(
                        "{owner} effectOps[{index}] ConvertDamage requires fromDamageType/toDamageType"
                    )),
                }
            } else if op_id.eq_ignore_ascii_case("ReplaceAttackFamily") {
                match WeaponFamily::parse(&item.to_family) {
                    Some(to) => target.push(ResolvedOp::replace_family(
                        WeaponFamily::parse(&item.from_family),
                        to,
                    )),
                    None => self.error(format!(
                        "{owner} effectOps[{index}] ReplaceAttackFamily requires toFamily"
                    )),
                }
            } else if op_id.eq_ignore_ascii_case("AddProc") {
                if item.effect_id.is_empty() {
                    self.error(format!("{owner} effectOps[{index}] AddProc requires effectId"));
                    continue;
                }
                target.push(ResolvedOp::add_proc(
                    item.effect_id.clone(),
                    item.chance.clamp(0.0, 1.0),
                    item.proc_coef.max(0.0),
                ));
            } else {
                self.error(format!("{owner} effectOps[{index}] unknown op '{op_id}'"));
            }
        }
    }

    /// Rebuilds the base-module index and the digest, and marks the catalog loaded.
    pub(crate) fn finish(&mut self) {
        self.blueprints_by_base_module.clear();
        for blueprint in self.blueprints.values() {
            self.blueprints_by_base_module
                .entry(blueprint.base_module_id.clone())
                .or_default()
                .push(blueprint.id.clone());
        }
        self.catalog_digest = self.compute_digest();
        self.loaded = true;
    }

    /// FNV-1a over the ordinal-sorted ids of manufacturers, parts, then blueprints.
    fn compute_digest(&self) -> u32 {
        let mut hash = Fnv1a::new();
        for id in self
            .manufacturers
            .keys()
            .chain(self.parts.keys())
            .chain(self.blueprints.keys())
        {
            hash.append_str(id);
        }
        hash.finish()
    }

    pub fn manufacturer(&self, id: &str) -> Option<&ManufacturerRuntime> {
        self.manufacturers.get(id)
    }

    pub fn part(&self, id: &str) -> Option<&PartRuntime> {
        self.parts.get(id)
    }

    pub fn blueprint(&self, id: &str) -> Option<&BlueprintRuntime> {
        self.blueprints.get(id)
    }

    pub fn manufacturers(&self) -> impl Iterator<Item = &ManufacturerRuntime> {
        self.manufacturers.values()
    }

    pub fn parts(&self) -> impl Iterator<Item = &PartRuntime> {
        self.parts.values()
    }

    pub fn blueprints(&self) -> impl Iterator<Item = &BlueprintRuntime> {
        self.blueprints.values()
    }

    /// Whether `slot_type` may appear more than once in a blueprint, ignoring
    /// case. Unknown slot types are single.
    pub fn slot_allows_multiple(&self, slot_type: &str) -> bool {
        self.slot_allow_multiple
            .get(&fold_key(slot_type))
            .copied()
            .unwrap_or(false)
    }

    /// Blueprints built on `base_module_id`, ordered by blueprint id.
    pub fn blueprints_for_base_module(&self, base_module_id: &str) -> Vec<&BlueprintRuntime> {
        self.blueprints_by_base_module
            .get(base_module_id)
            .map(|ids| ids.iter().filter_map(|id| self.blueprints.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn base_module_index(&self) -> &BTreeMap<String, Vec<String>> {
        &self.blueprints_by_base_module
    }

    /// One message per blueprint whose base module is not in `known_modules`.
    pub fn validate_base_modules<'a, I>(&self, known_modules: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: BTreeSet<&str> = known_modules.into_iter().collect();
        self.blueprints
            .values()
            .filter(|blueprint| !known.contains(blueprint.base_module_id.as_str()))
            .map(|blueprint| {
                format!(
                    "blueprint '{}' missing base module '{}'",
                    blueprint.id, blueprint.base_module_id
                )
            })
            .collect()
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    pub fn catalog_digest(&self) -> u32 {
        self.catalog_digest
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn status(&self) -> CatalogStatus {
        CatalogStatus {
            loaded: self.loaded,
            has_errors: !self.validation_errors.is_empty(),
            catalog_digest: self.catalog_digest,
            validation_error_count: self.validation_errors.len(),
        }
    }

    pub fn status_report(&self) -> CatalogStatusReport {
        CatalogStatusReport {
            source: self.source_label.clone(),
            status: self.status(),
            manufacturers: self.manufacturers.len(),
            parts: self.parts.len(),
            blueprints: self.blueprints.len(),
            validation_errors: self.validation_errors.clone(),
        }
    }
}
