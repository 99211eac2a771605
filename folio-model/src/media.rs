use std::fmt;

/// Location of a media resource. Either an absolute URL or a path relative
/// to the site's asset root; resolution is the fetcher's business.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct MediaUri(String);

impl MediaUri {
    /// Wrap a uri without checking it.
    pub fn new(uri: impl Into<String>) -> Self {
        MediaUri(uri.into())
    }

    /// The uri as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a blank or whitespace-only uri.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for MediaUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaUri {
    fn from(uri: &str) -> Self {
        MediaUri(uri.to_string())
    }
}

impl From<String> for MediaUri {
    fn from(uri: String) -> Self {
        MediaUri(uri)
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One media position within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MediaSlot {
    /// Static image, fetched and decoded ahead of display.
    Image(MediaUri),
    /// Interactive third-party content loaded by the viewing surface itself.
    #[cfg_attr(feature = "serde", serde(rename = "frame"))]
    EmbeddedFrame(MediaUri),
}

impl MediaSlot {
    /// The uri, whatever the slot kind.
    pub fn uri(&self) -> &MediaUri {
        match self {
            MediaSlot::Image(uri) | MediaSlot::EmbeddedFrame(uri) => uri,
        }
    }

    /// The uri when the slot is a static image.
    pub fn as_image(&self) -> Option<&MediaUri> {
        match self {
            MediaSlot::Image(uri) => Some(uri),
            MediaSlot::EmbeddedFrame(_) => None,
        }
    }

    /// True for a static image slot.
    pub fn is_image(&self) -> bool {
        matches!(self, MediaSlot::Image(_))
    }

    /// True for an embedded frame slot.
    pub fn is_embedded_frame(&self) -> bool {
        matches!(self, MediaSlot::EmbeddedFrame(_))
    }
}

/// Named layout position of a slot on the page: the primary surface plus the
/// three detail thumbnails next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SlotPosition {
    /// Main viewing surface.
    Primary,
    /// Large detail thumbnail.
    Large,
    /// First small detail thumbnail.
    SmallOne,
    /// Second small detail thumbnail.
    SmallTwo,
}

impl SlotPosition {
    /// Detail thumbnail positions in render order.
    pub const THUMBNAILS: [SlotPosition; 3] = [
        SlotPosition::Large,
        SlotPosition::SmallOne,
        SlotPosition::SmallTwo,
    ];

    /// Short name used in logs and console output.
    pub const fn label(self) -> &'static str {
        match self {
            SlotPosition::Primary => "primary",
            SlotPosition::Large => "large",
            SlotPosition::SmallOne => "small-1",
            SlotPosition::SmallTwo => "small-2",
        }
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
