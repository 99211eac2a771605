/// Stable identity of a catalogue project.
///
/// Indices move when a catalogue is reordered, ids do not, so cache entries
/// are keyed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ProjectId(pub u32);

impl ProjectId {
    /// Wrap a raw id.
    pub const fn new(id: u32) -> Self {
        ProjectId(id)
    }

    /// The raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProjectId {
    fn from(id: u32) -> Self {
        ProjectId(id)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
