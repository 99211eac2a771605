use crate::{
    CatalogueVariant, ModelError, ModelResult,
    ids::ProjectId,
    media::{MediaSlot, MediaUri},
};

/// One catalogue entry with an ordered set of media slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    display_name_key: String,
    media: Vec<MediaSlot>,
}

impl Project {
    /// Builds an unchecked project. [`crate::Catalogue::new`] validates it
    /// against the catalogue variant.
    pub fn new(
        id: impl Into<ProjectId>,
        display_name_key: impl Into<String>,
        media: Vec<MediaSlot>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name_key: display_name_key.into(),
            media,
        }
    }

    /// Stable identity of the project.
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Localization key of the project's display name.
    pub fn display_name_key(&self) -> &str {
        &self.display_name_key
    }

    /// All slots in media-index order.
    pub fn media(&self) -> &[MediaSlot] {
        &self.media
    }

    /// Slot at media `index`.
    pub fn slot(&self, index: usize) -> Option<&MediaSlot> {
        self.media.get(index)
    }

    /// Number of media slots.
    pub fn slot_count(&self) -> usize {
        self.media.len()
    }

    /// Slot 0.
    pub fn primary(&self) -> Option<&MediaSlot> {
        self.media.first()
    }

    /// True when slot 0 is an embedded frame.
    pub fn has_embedded_primary(&self) -> bool {
        self.primary().is_some_and(MediaSlot::is_embedded_frame)
    }

    /// Image slots with their media index, embedded frames skipped.
    pub fn image_slots(&self) -> impl Iterator<Item = (usize, &MediaUri)> {
        self.media
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_image().map(|uri| (index, uri)))
    }

    /// Media indices of the image slots, in order.
    pub fn image_slot_indices(&self) -> Vec<usize> {
        self.image_slots().map(|(index, _)| index).collect()
    }

    /// First image slot; what the project strip shows for this project.
    pub fn cover_slot(&self) -> Option<usize> {
        self.image_slots().next().map(|(index, _)| index)
    }

    pub(crate) fn validate(&self, variant: CatalogueVariant) -> ModelResult<()> {
        if self.display_name_key.trim().is_empty() {
            return Err(ModelError::EmptyNameKey(self.id));
        }

        let expected = variant.slot_count();
        if self.media.len() != expected {
            return Err(ModelError::SlotCountMismatch {
                project: self.id,
                expected,
                found: self.media.len(),
            });
        }

        for (slot, media) in self.media.iter().enumerate() {
            if media.uri().is_empty() {
                return Err(ModelError::EmptyUri {
                    project: self.id,
                    slot,
                });
            }
            if media.is_embedded_frame() && slot != 0 {
                return Err(ModelError::MisplacedFrame {
                    project: self.id,
                    slot,
                });
            }
        }

        if self.cover_slot().is_none() {
            return Err(ModelError::NoImageSlots(self.id));
        }

        Ok(())
    }
}
