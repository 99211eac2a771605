//! Thumbnail windowing.
//!
//! The project strip never shows more than [`WINDOW_SIZE`] entries. The
//! window slides with the focused project and pins to either end of the
//! catalogue instead of running past it.

use std::ops::Range;

use folio_model::Catalogue;

/// Number of thumbnails rendered at once.
pub const WINDOW_SIZE: usize = 3;

/// Indices to render as thumbnails for `total` items focused on `focus`.
///
/// The window is `min(total, WINDOW_SIZE)` long, contiguous, within
/// `0..total`, and contains `focus`. A focus past the end is treated as the
/// last item.
pub fn compute_window(total: usize, focus: usize) -> Range<usize> {
    if total <= WINDOW_SIZE {
        return 0..total;
    }
    let focus = focus.min(total - 1);
    let start = focus.saturating_sub(1).min(total - WINDOW_SIZE);
    start..start + WINDOW_SIZE
}

/// One (project, slot) pair of the project strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailEntry {
    /// Catalogue index.
    pub project: usize,
    /// Media index shown for the project: its cover image.
    pub slot: usize,
    /// Whether this is the focused project.
    pub active: bool,
}

/// Project strip for `catalogue` focused on `focus`.
pub fn thumbnail_window(
    catalogue: &Catalogue,
    focus: usize,
) -> Vec<ThumbnailEntry> {
    thumbnail_entries(catalogue, compute_window(catalogue.len(), focus), focus)
}

/// Entries for an already computed `window`.
pub fn thumbnail_entries(
    catalogue: &Catalogue,
    window: Range<usize>,
    focus: usize,
) -> Vec<ThumbnailEntry> {
    window
        .filter_map(|project| {
            let entry = catalogue.get(project)?;
            Some(ThumbnailEntry {
                project,
                slot: entry.cover_slot().unwrap_or(0),
                active: project == focus,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_catalogues_are_not_windowed() {
        assert_eq!(compute_window(0, 0), 0..0);
        assert_eq!(compute_window(1, 0), 0..1);
        assert_eq!(compute_window(3, 2), 0..3);
    }

    #[test]
    fn window_pins_to_both_ends() {
        assert_eq!(compute_window(8, 0), 0..3);
        assert_eq!(compute_window(8, 1), 0..3);
        assert_eq!(compute_window(8, 4), 3..6);
        assert_eq!(compute_window(8, 7), 5..8);
        assert_eq!(compute_window(5, 4), 2..5);
    }

    #[test]
    fn window_invariant_holds_for_every_focus() {
        for total in 0..=24 {
            for focus in 0..total {
                let window = compute_window(total, focus);
                assert_eq!(window.len(), total.min(WINDOW_SIZE));
                assert!(window.contains(&focus), "{total}/{focus}");
                assert!(window.end <= total);
            }
        }
    }

    #[test]
    fn focus_past_the_end_is_clamped() {
        assert_eq!(compute_window(6, 40), 3..6);
    }
}
