use crate::store::JournalStore;
use crate::DbError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{JournalEntry, Playbook, TradeRecord, UserProfile, UserSettings};
use curriculum::UniversityContent;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnection, PgPool};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// The `DbRepository` is the PostgreSQL-backed `JournalStore`.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// Database-specific trade struct that matches the trades table schema.
#[derive(Debug, Clone, FromRow)]
pub struct DbTrade {
    pub trade_id: Uuid,
    pub trade_date: NaiveDate,
    pub symbol: String,
    pub side: String,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub stop_loss: Option<Decimal>,
    pub pl: Decimal,
    pub r_multiple: Option<Decimal>,
    pub outcome: String,
    pub strategy: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbPlaybook {
    pub playbook_id: Uuid,
    pub name: String,
    pub description: String,
    pub entry_criteria: String,
    pub exit_criteria: String,
    pub risk_management: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbJournalEntry {
    pub entry_id: Uuid,
    pub entry_date: NaiveDate,
    pub title: String,
    pub body: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbUserProfile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

// --- Row conversions ---

impl TryFrom<DbTrade> for TradeRecord {
    type Error = DbError;

    fn try_from(row: DbTrade) -> Result<Self, Self::Error> {
        let side = row
            .side
            .parse()
            .map_err(|e| DbError::CorruptRow(format!("trade {}: {e}", row.trade_id)))?;
        let outcome = row
            .outcome
            .parse()
            .map_err(|e| DbError::CorruptRow(format!("trade {}: {e}", row.trade_id)))?;

        Ok(TradeRecord {
            id: row.trade_id,
            date: row.trade_date,
            symbol: row.symbol,
            side,
            quantity: row.quantity,
            entry_price: row.entry_price,
            exit_price: row.exit_price,
            stop_loss: row.stop_loss,
            pl: row.pl,
            r_multiple: row.r_multiple,
            outcome,
            strategy: row.strategy,
            tags: row.tags,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbPlaybook> for Playbook {
    fn from(row: DbPlaybook) -> Self {
        Playbook {
            id: row.playbook_id,
            name: row.name,
            description: row.description,
            entry_criteria: row.entry_criteria,
            exit_criteria: row.exit_criteria,
            risk_management: row.risk_management,
            created_at: row.created_at,
        }
    }
}

impl From<DbJournalEntry> for JournalEntry {
    fn from(row: DbJournalEntry) -> Self {
        JournalEntry {
            id: row.entry_id,
            date: row.entry_date,
            title: row.title,
            entry: row.body,
            mood: row.mood,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbUserProfile> for UserProfile {
    type Error = DbError;

    fn try_from(row: DbUserProfile) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| DbError::CorruptRow(format!("profile {}: {e}", row.user_id)))?;
        Ok(UserProfile { user_id: row.user_id, email: row.email, role })
    }
}

const TRADE_COLUMNS: &str = "trade_id, trade_date, symbol, side, quantity, entry_price, exit_price, \
     stop_loss, pl, r_multiple, outcome, strategy, tags, notes, created_at, updated_at";

// --- Single-row writers shared by the pooled and transactional paths ---

async fn insert_trade_row(conn: &mut PgConnection, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO trades (
            trade_id, user_id, trade_date, symbol, side, quantity, entry_price, exit_price,
            stop_loss, pl, r_multiple, outcome, strategy, tags, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        "#,
    )
    .bind(trade.id)
    .bind(user_id)
    .bind(trade.date)
    .bind(&trade.symbol)
    .bind(trade.side.as_str())
    .bind(trade.quantity)
    .bind(trade.entry_price)
    .bind(trade.exit_price)
    .bind(trade.stop_loss)
    .bind(trade.pl)
    .bind(trade.r_multiple)
    .bind(trade.outcome.as_str())
    .bind(&trade.strategy)
    .bind(&trade.tags)
    .bind(&trade.notes)
    .bind(trade.created_at)
    .bind(trade.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_playbook_row(conn: &mut PgConnection, user_id: Uuid, playbook: &Playbook) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO playbooks (
            playbook_id, user_id, name, description, entry_criteria, exit_criteria, risk_management, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(playbook.id)
    .bind(user_id)
    .bind(&playbook.name)
    .bind(&playbook.description)
    .bind(&playbook.entry_criteria)
    .bind(&playbook.exit_criteria)
    .bind(&playbook.risk_management)
    .bind(playbook.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_journal_row(conn: &mut PgConnection, user_id: Uuid, entry: &JournalEntry) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO journal_entries (entry_id, user_id, entry_date, title, body, mood, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(entry.id)
    .bind(user_id)
    .bind(entry.date)
    .bind(&entry.title)
    .bind(&entry.entry)
    .bind(&entry.mood)
    .bind(entry.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a scoped `DELETE` and reports `NotFound` when nothing matched.
    async fn delete_owned(&self, sql: &str, user_id: Uuid, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query(sql).bind(id).bind(user_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl JournalStore for DbRepository {
    async fn list_trades(&self, user_id: Uuid) -> Result<Vec<TradeRecord>, DbError> {
        let sql = format!(
            "SELECT {TRADE_COLUMNS} FROM trades WHERE user_id = $1 ORDER BY trade_date DESC, created_at DESC, seq DESC"
        );
        let rows = sqlx::query_as::<_, DbTrade>(&sql).bind(user_id).fetch_all(&self.pool).await?;
        rows.into_iter().map(TradeRecord::try_from).collect()
    }

    async fn get_trade(&self, user_id: Uuid, trade_id: Uuid) -> Result<TradeRecord, DbError> {
        let sql = format!("SELECT {TRADE_COLUMNS} FROM trades WHERE trade_id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, DbTrade>(&sql)
            .bind(trade_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?;
        TradeRecord::try_from(row)
    }

    async fn insert_trade(&self, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        insert_trade_row(&mut conn, user_id, trade).await
    }

    async fn replace_trade(&self, user_id: Uuid, trade: &TradeRecord) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE trades SET
                trade_date = $3, symbol = $4, side = $5, quantity = $6, entry_price = $7,
                exit_price = $8, stop_loss = $9, pl = $10, r_multiple = $11, outcome = $12,
                strategy = $13, tags = $14, notes = $15, updated_at = $16
            WHERE trade_id = $1 AND user_id = $2
            "#,
        )
        .bind(trade.id)
        .bind(user_id)
        .bind(trade.date)
        .bind(&trade.symbol)
        .bind(trade.side.as_str())
        .bind(trade.quantity)
        .bind(trade.entry_price)
        .bind(trade.exit_price)
        .bind(trade.stop_loss)
        .bind(trade.pl)
        .bind(trade.r_multiple)
        .bind(trade.outcome.as_str())
        .bind(&trade.strategy)
        .bind(&trade.tags)
        .bind(&trade.notes)
        .bind(trade.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn delete_trade(&self, user_id: Uuid, trade_id: Uuid) -> Result<(), DbError> {
        self.delete_owned("DELETE FROM trades WHERE trade_id = $1 AND user_id = $2", user_id, trade_id)
            .await
    }

    async fn list_playbooks(&self, user_id: Uuid) -> Result<Vec<Playbook>, DbError> {
        let rows = sqlx::query_as::<_, DbPlaybook>(
            r#"
            SELECT playbook_id, name, description, entry_criteria, exit_criteria, risk_management, created_at
            FROM playbooks
            WHERE user_id = $1
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Playbook::from).collect())
    }

    async fn insert_playbook(&self, user_id: Uuid, playbook: &Playbook) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        insert_playbook_row(&mut conn, user_id, playbook).await
    }

    async fn delete_playbook(&self, user_id: Uuid, playbook_id: Uuid) -> Result<(), DbError> {
        self.delete_owned("DELETE FROM playbooks WHERE playbook_id = $1 AND user_id = $2", user_id, playbook_id)
            .await
    }

    async fn list_journal(&self, user_id: Uuid) -> Result<Vec<JournalEntry>, DbError> {
        let rows = sqlx::query_as::<_, DbJournalEntry>(
            r#"
            SELECT entry_id, entry_date, title, body, mood, created_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY entry_date DESC, created_at DESC, seq DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JournalEntry::from).collect())
    }

    async fn insert_journal(&self, user_id: Uuid, entry: &JournalEntry) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        insert_journal_row(&mut conn, user_id, entry).await
    }

    async fn delete_journal(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), DbError> {
        self.delete_owned("DELETE FROM journal_entries WHERE entry_id = $1 AND user_id = $2", user_id, entry_id)
            .await
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, DbError> {
        let row = sqlx::query_as::<_, DbUserProfile>(
            "SELECT user_id, email, role FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserProfile::try_from).transpose()
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, email, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET email = EXCLUDED.email, role = EXCLUDED.role
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_settings(&self, user_id: Uuid) -> Result<UserSettings, DbError> {
        let stored = sqlx::query_scalar::<_, Json<UserSettings>>(
            "SELECT settings FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored.map(|Json(settings)| settings).unwrap_or_default())
    }

    async fn save_settings(&self, user_id: Uuid, settings: &UserSettings) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, settings, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE SET settings = EXCLUDED.settings, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(Json(settings))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn reset_user_data(&self, user_id: Uuid) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for sql in [
            "DELETE FROM trades WHERE user_id = $1",
            "DELETE FROM playbooks WHERE user_id = $1",
            "DELETE FROM journal_entries WHERE user_id = $1",
        ] {
            sqlx::query(sql).bind(user_id).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::info!(%user_id, "Reset all journal data for user.");
        Ok(())
    }

    async fn import_records(
        &self,
        user_id: Uuid,
        trades: &[TradeRecord],
        playbooks: &[Playbook],
        journal: &[JournalEntry],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        // Oldest first, so the head of each list gets the highest `seq`.
        for trade in trades.iter().rev() {
            insert_trade_row(&mut tx, user_id, trade).await?;
        }
        for playbook in playbooks.iter().rev() {
            insert_playbook_row(&mut tx, user_id, playbook).await?;
        }
        for entry in journal.iter().rev() {
            insert_journal_row(&mut tx, user_id, entry).await?;
        }

        tx.commit().await?;
        tracing::info!(
            %user_id,
            trades = trades.len(),
            playbooks = playbooks.len(),
            journal = journal.len(),
            "Imported journal records."
        );
        Ok(())
    }

    async fn load_university(&self) -> Result<Option<UniversityContent>, DbError> {
        let stored = sqlx::query_scalar::<_, Json<UniversityContent>>(
            "SELECT content FROM university_content WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored.map(|Json(content)| content))
    }

    async fn save_university(&self, content: &UniversityContent) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO university_content (id, content, updated_at)
            VALUES (1, $1, NOW())
            ON CONFLICT (id) DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
            "#,
        )
        .bind(Json(content))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
