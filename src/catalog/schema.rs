//! Serialized shape of a module blueprint catalog document.
//!
//! Every field defaults, so partial documents still deserialize; semantic
//! checks happen in [crate::catalog::store].

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` select YAML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

pub fn parse_document<T: DeserializeOwned>(
    text: &str,
    format: DocumentFormat,
    source_name: &str,
) -> Result<T> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|err| Error::Json {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|err| Error::Yaml {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }),
    }
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub slot_types: Vec<SlotTypeDoc>,
    #[serde(default)]
    pub manufacturers: Vec<ManufacturerDoc>,
    #[serde(default)]
    pub parts: Vec<PartDoc>,
    #[serde(default)]
    pub blueprints: Vec<BlueprintDoc>,
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            slot_types: Vec::new(),
            manufacturers: Vec::new(),
            parts: Vec::new(),
            blueprints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTypeDoc {
    #[serde(default)]
    pub slot_type: String,
    #[serde(default)]
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerDoc {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub signature_rule_id: String,
    #[serde(default)]
    pub stat_mods: Vec<StatModDoc>,
    #[serde(default)]
    pub tag_ops: Vec<TagOpDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDoc {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slot_type: String,
    #[serde(default)]
    pub stat_mods: Vec<StatModDoc>,
    #[serde(default)]
    pub tag_ops: Vec<TagOpDoc>,
    #[serde(default)]
    pub effect_ops: Vec<EffectOpDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintDoc {
    #[serde(default)]
    pub blueprint_id: String,
    #[serde(default)]
    pub base_module_id: String,
    #[serde(default)]
    pub manufacturer_id: String,
    #[serde(default)]
    pub parts: Vec<String>,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub tier: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatModDoc {
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub stat_id: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagOpDoc {
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub tag_id: String,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectOpDoc {
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub effect_id: String,
    #[serde(default)]
    pub from_damage_type: String,
    #[serde(default)]
    pub to_damage_type: String,
    #[serde(default)]
    pub pct: f64,
    #[serde(default)]
    pub from_family: String,
    #[serde(default)]
    pub to_family: String,
    #[serde(default)]
    pub chance: f64,
    #[serde(default)]
    pub proc_coef: f64,
}
