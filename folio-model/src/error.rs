use std::fmt::{self, Display};

use crate::ids::ProjectId;

/// Errors produced while validating a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No projects at all.
    EmptyCatalogue,
    /// Two projects share an id.
    DuplicateProject(ProjectId),
    /// A project has a blank display name key.
    EmptyNameKey(ProjectId),
    /// Slot count differs from the variant's layout.
    SlotCountMismatch {
        /// Offending project.
        project: ProjectId,
        /// Slots the variant requires.
        expected: usize,
        /// Slots the project has.
        found: usize,
    },
    /// An embedded frame outside the primary slot.
    MisplacedFrame {
        /// Offending project.
        project: ProjectId,
        /// Media index of the frame.
        slot: usize,
    },
    /// Every slot of the project is an embedded frame.
    NoImageSlots(ProjectId),
    /// A slot with a blank uri.
    EmptyUri {
        /// Offending project.
        project: ProjectId,
        /// Media index of the blank slot.
        slot: usize,
    },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyCatalogue => {
                write!(f, "catalogue must contain at least one project")
            }
            ModelError::DuplicateProject(id) => {
                write!(f, "duplicate project id {id}")
            }
            ModelError::EmptyNameKey(id) => {
                write!(f, "project {id} has an empty display name key")
            }
            ModelError::SlotCountMismatch {
                project,
                expected,
                found,
            } => write!(
                f,
                "project {project} has {found} media slots, catalogue expects {expected}"
            ),
            ModelError::MisplacedFrame { project, slot } => write!(
                f,
                "project {project} has an embedded frame in slot {slot}; frames are only allowed as the primary slot"
            ),
            ModelError::NoImageSlots(id) => {
                write!(f, "project {id} has no image slots")
            }
            ModelError::EmptyUri { project, slot } => {
                write!(f, "project {project} slot {slot} has an empty uri")
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Result alias for catalogue validation.
pub type Result<T> = std::result::Result<T, ModelError>;
