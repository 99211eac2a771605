//! Ambient page scroll control.

/// The host page's scroll affordance.
///
/// The engine never calls these directly; it holds a scoped lock that
/// suspends on first acquisition and restores when the last holder is
/// dropped.
pub trait ScrollAffordance: Send + Sync {
    /// Stop the page behind an overlay from scrolling.
    fn suspend(&self);

    /// Give scrolling back to the page.
    fn restore(&self);
}
