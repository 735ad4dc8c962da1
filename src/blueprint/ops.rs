//! The blueprint op language: one primitive modification per [ResolvedOp].
//!
//! Catalog entries and run perks share this shape. In documents an op is written
//! with an `op` tag, e.g. `{ "op": "MulStat", "stat": "Damage", "value": 1.15 }`.

use serde::{Deserialize, Serialize};

use crate::blueprint::types::{DamageType, OpKind, StatId, WeaponFamily};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum ResolvedOp {
    AddStat {
        stat: StatId,
        value: f64,
    },
    MulStat {
        stat: StatId,
        value: f64,
    },
    AddTag {
        tag: String,
        #[serde(default = "default_tag_value")]
        value: f64,
    },
    RemoveTag {
        tag: String,
    },
    /// `pct` is a fraction in `[0, 1]` of the source bucket.
    ConvertDamage {
        from: DamageType,
        to: DamageType,
        pct: f64,
    },
    /// Only fires when `from` is unset or equals the current family.
    ReplaceAttackFamily {
        #[serde(default)]
        from: Option<WeaponFamily>,
        to: WeaponFamily,
    },
    AddProc {
        effect_id: String,
        chance: f64,
        #[serde(default)]
        proc_coefficient: f64,
    },
}

fn default_tag_value() -> f64 {
    1.0
}

impl ResolvedOp {
    pub fn add_stat(stat: StatId, value: f64) -> Self {
        Self::AddStat { stat, value }
    }

    pub fn mul_stat(stat: StatId, value: f64) -> Self {
        Self::MulStat { stat, value }
    }

    pub fn add_tag(tag: impl Into<String>, value: f64) -> Self {
        Self::AddTag {
            tag: tag.into(),
            value,
        }
    }

    pub fn remove_tag(tag: impl Into<String>) -> Self {
        Self::RemoveTag { tag: tag.into() }
    }

    pub fn convert_damage(from: DamageType, to: DamageType, pct: f64) -> Self {
        Self::ConvertDamage { from, to, pct }
    }

    pub fn replace_family(from: Option<WeaponFamily>, to: WeaponFamily) -> Self {
        Self::ReplaceAttackFamily { from, to }
    }

    pub fn add_proc(effect_id: impl Into<String>, chance: f64, proc_coefficient: f64) -> Self {
        Self::AddProc {
            effect_id: effect_id.into(),
            chance,
            proc_coefficient,
        }
    }

    pub const fn kind(&self) -> OpKind {
        match self {
            Self::AddStat { .. } => OpKind::AddStat,
            Self::MulStat { .. } => OpKind::MulStat,
            Self::AddTag { .. } => OpKind::AddTag,
            Self::RemoveTag { .. } => OpKind::RemoveTag,
            Self::ConvertDamage { .. } => OpKind::ConvertDamage,
            Self::ReplaceAttackFamily { .. } => OpKind::ReplaceAttackFamily,
            Self::AddProc { .. } => OpKind::AddProc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perk_ops_deserialize_from_tagged_json() {
        let raw = r#"[
            {"op": "MulStat", "stat": "Damage", "value": 1.15},
            {"op": "AddTag", "tag": "perk.overcharge"},
            {"op": "ReplaceAttackFamily", "to": "Explosive"},
            {"op": "ConvertDamage", "from": "Kinetic", "to": "EM", "pct": 0.5}
        ]"#;
        let ops: Vec<ResolvedOp> = serde_json::from_str(raw).unwrap();
        assert_eq!(ops[0], ResolvedOp::mul_stat(StatId::Damage, 1.15));
        assert_eq!(ops[1], ResolvedOp::add_tag("perk.overcharge", 1.0));
        assert_eq!(
            ops[2],
            ResolvedOp::replace_family(None, WeaponFamily::Explosive)
        );
        assert_eq!(ops[3].kind(), OpKind::ConvertDamage);
    }

    #[test]
    fn unknown_op_tag_is_rejected() {
        let raw = r#"{"op": "Teleport", "value": 1.0}"#;
        assert!(serde_json::from_str::<ResolvedOp>(raw).is_err());
    }
}
