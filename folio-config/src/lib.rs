//! Site configuration for Folio.
//!
//! One document describes the catalogue, the translation tables, gallery
//! tuning and where assets come from. [`SiteConfig::load_from_env`] finds
//! it, [`SiteConfig::validate`] checks it, and the builders turn it into the
//! engine's own types.

pub mod models;

pub use models::assets::AssetsConfig;
pub use models::catalogue::{CatalogueConfig, ProjectConfig};
pub use models::localization::LocalizationConfig;
pub use models::{ConfigSource, ConfigWarning, SiteConfig};
