//! Gallery tuning knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime settings for the gallery engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GallerySettings {
    /// Minimum horizontal travel (px) before a touch counts as a swipe.
    pub swipe_threshold_px: f32,
    /// Advance to the next project on this interval while the modal is
    /// closed. Off when unset.
    pub autoplay_interval_ms: Option<u64>,
    /// Fade the hosts apply to the primary surface while a navigation is in
    /// flight. Passed through to render frames.
    pub transition_fade_ms: u64,
    /// Preload the other projects of the thumbnail window after each
    /// committed navigation.
    pub warm_window: bool,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            swipe_threshold_px: 50.0,
            autoplay_interval_ms: None,
            transition_fade_ms: 150,
            warm_window: true,
        }
    }
}

impl GallerySettings {
    /// Autoplay period, or `None` when disabled.
    pub fn autoplay_interval(&self) -> Option<Duration> {
        self.autoplay_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let settings: GallerySettings =
            serde_json::from_str(r#"{"autoplay_interval_ms":5000}"#).unwrap();
        assert_eq!(settings.swipe_threshold_px, 50.0);
        assert_eq!(
            settings.autoplay_interval(),
            Some(Duration::from_millis(5000))
        );
    }

    #[test]
    fn zero_interval_disables_autoplay() {
        let settings = GallerySettings {
            autoplay_interval_ms: Some(0),
            ..GallerySettings::default()
        };
        assert_eq!(settings.autoplay_interval(), None);
    }
}
