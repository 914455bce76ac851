use crate::store::JournalStore;
use crate::DbError;
use async_trait::async_trait;
use core_types::{JournalEntry, Playbook, TradeRecord, UserProfile, UserSettings};
use curriculum::UniversityContent;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A `JournalStore` that keeps everything in process memory.
///
/// Ordering matches the PostgreSQL repository; ties on date and creation time
/// resolve newest-inserted first. Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, UserData>,
    profiles: HashMap<Uuid, UserProfile>,
    university: Option<UniversityContent>,
}

/// Each list is kept newest-inserted first.
#[derive(Debug, Default)]
struct UserData {
    trades: Vec<TradeRecord>,
    playbooks: Vec<Playbook>,
    journal: Vec<JournalEntry>,
    settings: Option<UserSettings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Result<(), DbError> {
    let position = items.iter().position(matches).ok_or(DbError::NotFound)?;
    items.remove(position);
    Ok(())
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn list_trades(&self, user_id: Uuid) -> Result<Vec<TradeRecord>, DbError> {
        let state = self.state.read().await;
        let mut trades = state.users.get(&user_id).map(|u| u.trades.clone()).unwrap_or_default();
        trades.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(trades)
    }

    async fn get_trade(&self, user_id: Uuid, trade_id: Uuid) -> Result<TradeRecord, DbError> {
        let state = self.state.read().await;
        state
            .users
            .get(&user_id)
            .and_then(|u| u.trades.iter().find(|t| t.id == trade_id))
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn insert_trade(&self, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        state.users.entry(user_id).or_default().trades.insert(0, trade.clone());
        Ok(())
    }

    async fn replace_trade(&self, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let slot = state
            .users
            .get_mut(&user_id)
            .and_then(|u| u.trades.iter_mut().find(|t| t.id == trade.id))
            .ok_or(DbError::NotFound)?;
        *slot = trade.clone();
        Ok(())
    }

    async fn delete_trade(&self, user_id: Uuid, trade_id: Uuid) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&user_id).ok_or(DbError::NotFound)?;
        remove_by(&mut user.trades, |t| t.id == trade_id)
    }

    async fn list_playbooks(&self, user_id: Uuid) -> Result<Vec<Playbook>, DbError> {
        let state = self.state.read().await;
        let mut playbooks = state.users.get(&user_id).map(|u| u.playbooks.clone()).unwrap_or_default();
        playbooks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(playbooks)
    }

    async fn insert_playbook(&self, user_id: Uuid, playbook: &Playbook) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        state.users.entry(user_id).or_default().playbooks.insert(0, playbook.clone());
        Ok(())
    }

    async fn delete_playbook(&self, user_id: Uuid, playbook_id: Uuid) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&user_id).ok_or(DbError::NotFound)?;
        remove_by(&mut user.playbooks, |p| p.id == playbook_id)
    }

    async fn list_journal(&self, user_id: Uuid) -> Result<Vec<JournalEntry>, DbError> {
        let state = self.state.read().await;
        let mut entries = state.users.get(&user_id).map(|u| u.journal.clone()).unwrap_or_default();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(entries)
    }

    async fn insert_journal(&self, user_id: Uuid, entry: &JournalEntry) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        state.users.entry(user_id).or_default().journal.insert(0, entry.clone());
        Ok(())
    }

    async fn delete_journal(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&user_id).ok_or(DbError::NotFound)?;
        remove_by(&mut user.journal, |e| e.id == entry_id)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DbError> {
        Ok(self.state.read().await.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        self.state.write().await.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn get_settings(&self, user_id: Uuid) -> Result<UserSettings, DbError> {
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).and_then(|u| u.settings.clone()).unwrap_or_default())
    }

    async fn save_settings(&self, user_id: Uuid, settings: &UserSettings) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        state.users.entry(user_id).or_default().settings = Some(settings.clone());
        Ok(())
    }

    async fn reset_user_data(&self, user_id: Uuid) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.get_mut(&user_id) {
            user.trades.clear();
            user.playbooks.clear();
            user.journal.clear();
        }
        Ok(())
    }

    async fn import_records(
        &self,
        user_id: Uuid,
        trades: &[TradeRecord],
        playbooks: &[Playbook],
        journal: &[JournalEntry],
    ) -> Result<(), DbError> {
        // A single write guard makes the batch visible all at once.
        let mut state = self.state.write().await;
        let user = state.users.entry(user_id).or_default();
        // Each batch is already newest-first; keep it that way at the head.
        user.trades.splice(0..0, trades.iter().cloned());
        user.playbooks.splice(0..0, playbooks.iter().cloned());
        user.journal.splice(0..0, journal.iter().cloned());
        Ok(())
    }

    async fn load_university(&self) -> Result<Option<UniversityContent>, DbError> {
        Ok(self.state.read().await.university.clone())
    }

    async fn save_university(&self, content: &UniversityContent) -> Result<(), DbError> {
        self.state.write().await.university = Some(content.clone());
        Ok(())
    }
}
