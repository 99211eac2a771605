use anyhow::Context;
use folio_model::{Catalogue, CatalogueVariant, MediaSlot, Project};
use serde::{Deserialize, Serialize};

/// One project as written in the site document.
///
/// ```toml
/// [[catalogue.projects]]
/// id = 3
/// name_key = "projects.harbour"
/// media = [
///   { frame = "https://player.example/embed/3" },
///   { image = "img/harbour/1.webp" },
///   { image = "img/harbour/2.webp" },
///   { image = "img/harbour/3.webp" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Stable project id.
    pub id: u32,
    /// Localization key of the display name.
    pub name_key: String,
    /// Slots in media-index order.
    pub media: Vec<MediaSlot>,
}

impl From<&ProjectConfig> for Project {
    fn from(value: &ProjectConfig) -> Self {
        Project::new(value.id, value.name_key.clone(), value.media.clone())
    }
}

/// `[catalogue]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Slot layout shared by all projects.
    pub variant: CatalogueVariant,
    /// Projects in display order.
    pub projects: Vec<ProjectConfig>,
}

impl CatalogueConfig {
    /// Validate into a [`Catalogue`].
    pub fn build(&self) -> anyhow::Result<Catalogue> {
        let projects = self.projects.iter().map(Project::from).collect();
        Catalogue::new(self.variant, projects).with_context(|| {
            format!(
                "invalid {:?} catalogue of {} projects",
                self.variant,
                self.projects.len()
            )
        })
    }
}
