use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A written trading setup: what to look for, how to get in and out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playbook {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub entry_criteria: String,
    pub exit_criteria: String,
    pub risk_management: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybookInput {
    pub name: String,
    pub description: String,
    pub entry_criteria: String,
    pub exit_criteria: String,
    pub risk_management: String,
}

impl Playbook {
    pub fn create(id: Uuid, input: PlaybookInput, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(
                "name".to_string(),
                "a playbook needs a name".to_string(),
            ));
        }
        Ok(Self {
            id,
            name,
            description: input.description.trim().to_string(),
            entry_criteria: input.entry_criteria.trim().to_string(),
            exit_criteria: input.exit_criteria.trim().to_string(),
            risk_management: input.risk_management.trim().to_string(),
            created_at: now,
        })
    }
}

/// A dated reflection on a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub entry: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub mood: Option<String>,
}

impl JournalEntry {
    pub fn create(id: Uuid, input: JournalInput, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let title = input.title.trim().to_string();
        let entry = input.entry.trim().to_string();
        if title.is_empty() && entry.is_empty() {
            return Err(CoreError::InvalidInput(
                "entry".to_string(),
                "a journal entry needs a title or some text".to_string(),
            ));
        }
        Ok(Self {
            id,
            date: input.date,
            title,
            entry,
            mood: input.mood.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
            created_at: now,
        })
    }
}
