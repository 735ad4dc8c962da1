//! Module blueprint resolution: layered manufacturer, part and perk ops folded
//! into a reproducible module profile.

pub mod accumulator;
pub mod aggregate;
pub mod apply;
pub mod assign;
pub mod conversion;
pub mod digest;
pub mod export_csv;
pub mod ops;
pub mod profile;
pub mod resolver;
pub mod types;

pub use aggregate::CarrierSummary;
pub use apply::DerivedEffectOp;
pub use assign::{auto_assign, Assignment};
pub use ops::ResolvedOp;
pub use profile::ModuleProfiles;
pub use resolver::{
    resolve, resolve_request, DerivedStat, DerivedTag, ModuleOutputs, ModuleRequest, ResolveResult,
    ResolvedModule,
};
pub use types::{
    BlueprintRef, DamageType, ModuleClass, ModuleSpec, MountSize, OpKind, StatId, WeaponDelivery,
    WeaponFamily,
};
