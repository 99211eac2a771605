//! Catalogue data model shared across Folio crates.
//!
//! Everything here is plain data plus construction-time validation. A
//! [`Catalogue`] that exists has already been checked against its
//! [`CatalogueVariant`], so downstream crates index into it without
//! re-validating slot counts or embedded-frame placement.
#![allow(missing_docs)]

pub mod catalogue;
pub mod error;
pub mod ids;
pub mod media;
pub mod project;

pub use catalogue::{Catalogue, CatalogueVariant};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ProjectId;
pub use media::{MediaSlot, MediaUri, SlotPosition};
pub use project::Project;
