use crate::DbError;
use async_trait::async_trait;
use core_types::{JournalEntry, Playbook, TradeRecord, UserProfile, UserSettings};
use curriculum::UniversityContent;
use uuid::Uuid;

/// Everything a user's journal needs from persistence.
///
/// Every per-user operation is scoped by `user_id`: a record that exists but
/// belongs to someone else is reported as `DbError::NotFound`, exactly as if it
/// did not exist. The HTTP layer holds the store as `Arc<dyn JournalStore>` so
/// the same handlers run against PostgreSQL or the in-memory store.
#[async_trait]
pub trait JournalStore: Send + Sync {
    // --- Trades ---

    /// All of the user's trades, most recent first (trade date, then creation time).
    async fn list_trades(&self, user_id: Uuid) -> Result<Vec<TradeRecord>, DbError>;
    async fn get_trade(&self, user_id: Uuid, trade_id: Uuid) -> Result<TradeRecord, DbError>;
    async fn insert_trade(&self, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError>;
    /// Overwrites the stored trade with the same id.
    async fn replace_trade(&self, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError>;
    async fn delete_trade(&self, user_id: Uuid, trade_id: Uuid) -> Result<(), DbError>;

    // --- Playbooks ---

    /// Newest first.
    async fn list_playbooks(&self, user_id: Uuid) -> Result<Vec<Playbook>, DbError>;
    async fn insert_playbook(&self, user_id: Uuid, playbook: &Playbook) -> Result<(), DbError>;
    async fn delete_playbook(&self, user_id: Uuid, playbook_id: Uuid) -> Result<(), DbError>;

    // --- Journal entries ---

    /// Most recent first (entry date, then creation time).
    async fn list_journal(&self, user_id: Uuid) -> Result<Vec<JournalEntry>, DbError>;
    async fn insert_journal(&self, user_id: Uuid, entry: &JournalEntry) -> Result<(), DbError>;
    async fn delete_journal(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), DbError>;

    // --- Account ---

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DbError>;
    /// Creates the profile or refreshes its email and role.
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), DbError>;
    /// Stored settings, or the defaults when the user never saved any.
    async fn get_settings(&self, user_id: Uuid) -> Result<UserSettings, DbError>;
    async fn save_settings(&self, user_id: Uuid, settings: &UserSettings) -> Result<(), DbError>;

    /// Deletes the user's trades, playbooks and journal entries in one step.
    async fn reset_user_data(&self, user_id: Uuid) -> Result<(), DbError>;

    /// Appends a batch of already-derived records in one step; either all land or none do.
    async fn import_records(
        &self,
        user_id: Uuid,
        trades: &[TradeRecord],
        playbooks: &[Playbook],
        journal: &[JournalEntry],
    ) -> Result<(), DbError>;

    // --- Shared education content ---

    /// `None` until an administrator saves the content for the first time.
    async fn load_university(&self) -> Result<Option<UniversityContent>, DbError>;
    async fn save_university(&self, content: &UniversityContent) -> Result<(), DbError>;
}
