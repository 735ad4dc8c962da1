//! Module blueprint resolution engine.
//!
//! A module's final profile is folded from its archetype, its manufacturer, its
//! parts and any run perks, then hashed into a digest that is stable across
//! replays. Catalogs load once and are shared read-only between resolutions.

pub mod blueprint;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod logging;
pub mod parallel;

pub use error::{Error, Result};
