//! Applies resolved ops to an [Accumulator], in the order given.
//!
//! Stat ops mutate immediately, so `Mul` then `Add` differs from `Add` then `Mul`.
//! Damage conversions are only registered here; [crate::blueprint::conversion]
//! runs them once after every layer has been applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::blueprint::accumulator::Accumulator;
use crate::blueprint::conversion::ConversionRule;
use crate::blueprint::ops::ResolvedOp;
use crate::blueprint::resolver::DerivedTag;
use crate::blueprint::types::{fold_key, DamageType, OpKind, WeaponFamily};

/// Effect record exposed to downstream consumers. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedEffectOp {
    pub kind: OpKind,
    #[serde(default)]
    pub effect_id: String,
    #[serde(default)]
    pub chance: f64,
    #[serde(default)]
    pub proc_coefficient: f64,
    #[serde(default)]
    pub from_damage_type: Option<DamageType>,
    #[serde(default)]
    pub to_damage_type: Option<DamageType>,
    #[serde(default)]
    pub conversion_pct: f64,
    #[serde(default)]
    pub from_family: Option<WeaponFamily>,
    #[serde(default)]
    pub to_family: Option<WeaponFamily>,
}

impl DerivedEffectOp {
    fn empty(kind: OpKind) -> Self {
        Self {
            kind,
            effect_id: String::new(),
            chance: 0.0,
            proc_coefficient: 0.0,
            from_damage_type: None,
            to_damage_type: None,
            conversion_pct: 0.0,
            from_family: None,
            to_family: None,
        }
    }
}

/// Mutable state threaded through every op of one resolution.
#[derive(Debug, Default)]
pub struct OpContext {
    pub conversions: Vec<ConversionRule>,
    /// Keyed by [fold_key]; each entry keeps the spelling that first added it.
    pub tags: BTreeMap<String, DerivedTag>,
    pub effects: Vec<DerivedEffectOp>,
}

impl OpContext {
    pub fn tag(&self, tag_id: &str) -> Option<f64> {
        self.tags.get(&fold_key(tag_id)).map(|tag| tag.value)
    }
}

pub fn apply_ops<'a, I>(ops: I, acc: &mut Accumulator, ctx: &mut OpContext)
where
    I: IntoIterator<Item = &'a ResolvedOp>,
{
    for op in ops {
        apply_op(op, acc, ctx);
    }
}

pub fn apply_op(op: &ResolvedOp, acc: &mut Accumulator, ctx: &mut OpContext) {
    match op {
        ResolvedOp::AddStat { stat, value } => acc.add_stat(*stat, *value),
        ResolvedOp::MulStat { stat, value } => acc.mul_stat(*stat, *value),
        ResolvedOp::AddTag { tag, value } => {
            ctx.tags
                .entry(fold_key(tag))
                .and_modify(|entry| entry.value = *value)
                .or_insert_with(|| DerivedTag {
                    tag_id: tag.clone(),
                    value: *value,
                });
        }
        ResolvedOp::RemoveTag { tag } => {
            ctx.tags.remove(&fold_key(tag));
        }
        ResolvedOp::ConvertDamage { from, to, pct } => {
            let pct = pct.clamp(0.0, 1.0);
            if pct <= 0.0 {
                return;
            }
            ctx.conversions.push(ConversionRule {
                from: *from,
                to: *to,
                pct,
            });
            ctx.effects.push(DerivedEffectOp {
                from_damage_type: Some(*from),
                to_damage_type: Some(*to),
                conversion_pct: pct,
                ..DerivedEffectOp::empty(OpKind::ConvertDamage)
            });
        }
        ResolvedOp::ReplaceAttackFamily { from, to } => {
            if from.is_some() && *from != acc.attack_family {
                return;
            }
            acc.attack_family = Some(*to);
            acc.delivery = Some(to.delivery());
            acc.family_explicit = true;
            ctx.effects.push(DerivedEffectOp {
                from_family: *from,
                to_family: Some(*to),
                ..DerivedEffectOp::empty(OpKind::ReplaceAttackFamily)
            });
        }
        ResolvedOp::AddProc {
            effect_id,
            chance,
            proc_coefficient,
        } => {
            if effect_id.is_empty() {
                return;
            }
            ctx.effects.push(DerivedEffectOp {
                effect_id: effect_id.clone(),
                chance: chance.clamp(0.0, 1.0),
                proc_coefficient: proc_coefficient.max(0.0),
                ..DerivedEffectOp::empty(OpKind::AddProc)
            });
        }
    }
}
