use crate::error::CurriculumError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default = "default_icon")]
    pub icon: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free text such as "8 Lessons".
    #[serde(default)]
    pub lessons: String,
    #[serde(default)]
    pub level: String,
}

fn default_icon() -> String {
    "📚".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingItem {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLink {
    pub title: String,
    pub url: String,
}

/// The stored education document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniversityContent {
    pub courses: Vec<Course>,
    pub reading_list: Vec<ReadingItem>,
    pub external_links: Vec<ExternalLink>,
}

/// The three editable lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Courses,
    Reading,
    Links,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Courses => "courses",
            Section::Reading => "reading",
            Section::Links => "links",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = CurriculumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "courses" => Ok(Section::Courses),
            "reading" => Ok(Section::Reading),
            "links" => Ok(Section::Links),
            other => Err(CurriculumError::UnknownSection(other.to_string())),
        }
    }
}

/// One item of any section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Course(Course),
    Reading(ReadingItem),
    Link(ExternalLink),
}

impl ContentItem {
    /// Parses a JSON body as an item of `section`.
    pub fn from_json(section: Section, value: Value) -> Result<Self, CurriculumError> {
        let parsed = match section {
            Section::Courses => serde_json::from_value(value).map(ContentItem::Course),
            Section::Reading => serde_json::from_value(value).map(ContentItem::Reading),
            Section::Links => serde_json::from_value(value).map(ContentItem::Link),
        };
        parsed.map_err(|e| CurriculumError::Invalid(format!("{section} item: {e}")))
    }

    pub fn section(&self) -> Section {
        match self {
            ContentItem::Course(_) => Section::Courses,
            ContentItem::Reading(_) => Section::Reading,
            ContentItem::Link(_) => Section::Links,
        }
    }

    /// Trims the item's text and checks the fields each section requires.
    pub fn validated(self) -> Result<Self, CurriculumError> {
        match self {
            ContentItem::Course(mut course) => {
                course.title = required(&course.title, "course title")?;
                course.icon = match course.icon.trim() {
                    "" => default_icon(),
                    icon => icon.to_string(),
                };
                course.description = course.description.trim().to_string();
                course.lessons = course.lessons.trim().to_string();
                course.level = course.level.trim().to_string();
                Ok(ContentItem::Course(course))
            }
            ContentItem::Reading(mut item) => {
                item.title = required(&item.title, "reading title")?;
                item.author = item
                    .author
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty());
                Ok(ContentItem::Reading(item))
            }
            ContentItem::Link(mut link) => {
                link.title = required(&link.title, "link title")?;
                link.url = required(&link.url, "link url")?;
                if !(link.url.starts_with("http://") || link.url.starts_with("https://")) {
                    return Err(CurriculumError::Invalid(format!(
                        "link url must start with http:// or https://, got '{}'",
                        link.url
                    )));
                }
                Ok(ContentItem::Link(link))
            }
        }
    }
}

fn required(value: &str, what: &str) -> Result<String, CurriculumError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CurriculumError::Invalid(format!("{what} must not be empty")));
    }
    Ok(trimmed.to_string())
}
