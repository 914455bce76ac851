//! # Tradebook Curriculum
//!
//! The education content every user sees next to their journal: a grid of
//! courses, a reading list and a list of useful links. Administrators curate it;
//! everyone else reads it.
//!
//! Until an administrator saves anything the built-in defaults are shown. The
//! first edit copies the complete default set into the stored document and then
//! applies the change, so stored content is never a mix of custom lists and
//! implicit defaults. After that the stored document is authoritative for all
//! three lists, including lists that were deliberately emptied.

pub mod content;
pub mod defaults;
pub mod editor;
pub mod error;

pub use content::{ContentItem, Course, ExternalLink, ReadingItem, Section, UniversityContent};
pub use editor::{apply_edit, effective, ContentEdit, UniversityView};
pub use error::CurriculumError;
