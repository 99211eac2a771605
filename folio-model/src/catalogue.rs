use std::collections::HashSet;

use crate::{
    ModelError, ModelResult,
    ids::ProjectId,
    media::SlotPosition,
    project::Project,
};

/// Slot layout shared by every project of a catalogue.
///
/// The layout is declared, never inferred from asset paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CatalogueVariant {
    /// Three slots: the primary image doubles as the large thumbnail.
    #[default]
    Triptych,
    /// Four slots: primary surface plus three distinct thumbnails.
    Quad,
}

impl CatalogueVariant {
    /// Media slots every project of this variant carries.
    pub const fn slot_count(self) -> usize {
        match self {
            CatalogueVariant::Triptych => 3,
            CatalogueVariant::Quad => 4,
        }
    }

    /// Media index shown at `position` for projects of this variant.
    pub const fn media_index(self, position: SlotPosition) -> usize {
        match (self, position) {
            (_, SlotPosition::Primary) => 0,
            (CatalogueVariant::Triptych, SlotPosition::Large) => 0,
            (CatalogueVariant::Triptych, SlotPosition::SmallOne) => 1,
            (CatalogueVariant::Triptych, SlotPosition::SmallTwo) => 2,
            (CatalogueVariant::Quad, SlotPosition::Large) => 1,
            (CatalogueVariant::Quad, SlotPosition::SmallOne) => 2,
            (CatalogueVariant::Quad, SlotPosition::SmallTwo) => 3,
        }
    }
}

/// Ordered, validated, non-empty list of projects. Fixed after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    variant: CatalogueVariant,
    projects: Vec<Project>,
}

impl Catalogue {
    /// Validate `projects` against `variant` and wrap them.
    pub fn new(
        variant: CatalogueVariant,
        projects: Vec<Project>,
    ) -> ModelResult<Self> {
        if projects.is_empty() {
            return Err(ModelError::EmptyCatalogue);
        }

        let mut seen = HashSet::with_capacity(projects.len());
        for project in &projects {
            if !seen.insert(project.id()) {
                return Err(ModelError::DuplicateProject(project.id()));
            }
            project.validate(variant)?;
        }

        Ok(Self { variant, projects })
    }

    /// Slot layout of every project.
    pub fn variant(&self) -> CatalogueVariant {
        self.variant
    }

    /// Always at least one.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Never true for a constructed catalogue.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects in display order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Project at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    /// Iterate projects in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Project> {
        self.projects.iter()
    }

    /// Display index of the project with `id`.
    pub fn position_of(&self, id: ProjectId) -> Option<usize> {
        self.projects.iter().position(|project| project.id() == id)
    }

    /// Index after `index`, wrapping from the last project to the first.
    pub fn wrap_next(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// Index before `index`, wrapping from the first project to the last.
    pub fn wrap_previous(&self, index: usize) -> usize {
        if index == 0 {
            self.len() - 1
        } else {
            (index - 1).min(self.len() - 1)
        }
    }

    /// Media index implied by `position` for the project at `index`.
    pub fn media_index(
        &self,
        index: usize,
        position: SlotPosition,
    ) -> Option<usize> {
        let project = self.get(index)?;
        let media_index = self.variant.media_index(position);
        (media_index < project.slot_count()).then_some(media_index)
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a Project;
    type IntoIter = std::slice::Iter<'a, Project>;

    fn into_iter(self) -> Self::IntoIter {
        self.projects.iter()
    }
}
