use crate::content::Section;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurriculumError {
    #[error("Only administrators can edit the shared education content")]
    Forbidden,

    #[error("No {section} item at index {index} (the list has {len} items)")]
    IndexOutOfRange { section: Section, index: usize, len: usize },

    #[error("Invalid content: {0}")]
    Invalid(String),

    #[error("Unknown content section '{0}'")]
    UnknownSection(String),
}
