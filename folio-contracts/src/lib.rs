//! Trait surfaces for the collaborators the gallery engine talks to.
//!
//! The engine never reaches for a network stack, a translation table or the
//! host page directly; it goes through these traits so hosts (and tests) can
//! plug in their own implementations.

pub mod fetch;
pub mod locale;
pub mod relay;
pub mod scroll;

/// Frequently used trait combinators for engine and host crates.
pub mod prelude {
    pub use super::fetch::{FetchError, MediaFetcher};
    pub use super::locale::{LocaleSubscription, Localizer};
    pub use super::relay::{ContactRequest, MailRelay, RelayResponse};
    pub use super::scroll::ScrollAffordance;
}
