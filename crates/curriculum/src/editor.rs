use crate::content::{ContentItem, Section, UniversityContent};
use crate::error::CurriculumError;
use core_types::UserRole;
use serde::Serialize;

/// A single change to the stored content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEdit {
    Add(ContentItem),
    Update { index: usize, item: ContentItem },
    Delete { section: Section, index: usize },
}

/// What a reader sees: the content plus whether it is still the built-in set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityView {
    pub content: UniversityContent,
    pub using_defaults: bool,
}

/// Stored content if an administrator ever saved any, otherwise the defaults.
pub fn effective(stored: Option<UniversityContent>) -> UniversityView {
    match stored {
        Some(content) => UniversityView { content, using_defaults: false },
        None => UniversityView { content: UniversityContent::defaults(), using_defaults: true },
    }
}

/// Applies one administrator edit and returns the full document to store.
///
/// With nothing stored yet the complete default set is seeded first, so the
/// result always holds all three lists. Indices refer to the list as
/// `effective` presents it.
pub fn apply_edit(
    stored: Option<UniversityContent>,
    role: UserRole,
    edit: ContentEdit,
) -> Result<UniversityContent, CurriculumError> {
    if !role.is_admin() {
        return Err(CurriculumError::Forbidden);
    }

    let mut content = stored.unwrap_or_else(UniversityContent::defaults);
    content.apply(edit)?;
    Ok(content)
}

impl UniversityContent {
    fn apply(&mut self, edit: ContentEdit) -> Result<(), CurriculumError> {
        match edit {
            ContentEdit::Add(item) => match item.validated()? {
                ContentItem::Course(course) => self.courses.push(course),
                ContentItem::Reading(reading) => self.reading_list.push(reading),
                ContentItem::Link(link) => self.external_links.push(link),
            },
            ContentEdit::Update { index, item } => match item.validated()? {
                ContentItem::Course(course) => *slot(&mut self.courses, Section::Courses, index)? = course,
                ContentItem::Reading(reading) => {
                    *slot(&mut self.reading_list, Section::Reading, index)? = reading
                }
                ContentItem::Link(link) => *slot(&mut self.external_links, Section::Links, index)? = link,
            },
            ContentEdit::Delete { section, index } => match section {
                Section::Courses => remove(&mut self.courses, section, index)?,
                Section::Reading => remove(&mut self.reading_list, section, index)?,
                Section::Links => remove(&mut self.external_links, section, index)?,
            },
        }
        Ok(())
    }
}

fn slot<T>(list: &mut [T], section: Section, index: usize) -> Result<&mut T, CurriculumError> {
    let len = list.len();
    list.get_mut(index)
        .ok_or(CurriculumError::IndexOutOfRange { section, index, len })
}

fn remove<T>(list: &mut Vec<T>, section: Section, index: usize) -> Result<(), CurriculumError> {
    if index >= list.len() {
        return Err(CurriculumError::IndexOutOfRange { section, index, len: list.len() });
    }
    list.remove(index);
    Ok(())
}
