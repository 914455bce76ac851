use crate::{
    error::AppError,
    extract::{ApiJson, CurrentUser},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};
use core_types::{
    JournalEntry, JournalInput, Playbook, PlaybookInput, TradeInput, TradeRecord, UserProfile, UserSettings,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// # POST /api/profile
/// Registers the caller, granting the admin role to the configured admin email.
pub async fn upsert_profile(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = UserProfile::with_role_for(user.user_id, user.email, state.config.auth.admin_email.as_deref());
    state.store.upsert_profile(&profile).await?;
    tracing::info!(user_id = %profile.user_id, role = profile.role.as_str(), "Profile registered.");
    Ok(Json(profile))
}

/// # GET /api/settings
pub async fn get_settings(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(state.store.get_settings(user.user_id).await?))
}

/// # PUT /api/settings
pub async fn put_settings(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiJson(settings): ApiJson<UserSettings>,
) -> Result<Json<UserSettings>, AppError> {
    state.store.save_settings(user.user_id, &settings).await?;
    Ok(Json(settings))
}

// --- Backup ---

#[derive(Debug, Serialize)]
pub struct ExportBundle {
    pub trades: Vec<TradeRecord>,
    pub playbooks: Vec<Playbook>,
    pub journal: Vec<JournalEntry>,
}

/// An export file read back in. Only the user-editable fields are used.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImportBundle {
    pub trades: Vec<TradeInput>,
    pub playbooks: Vec<PlaybookInput>,
    pub journal: Vec<JournalInput>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub trades: usize,
    pub playbooks: usize,
    pub journal: usize,
}

/// # GET /api/export
pub async fn export_data(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExportBundle>, AppError> {
    let bundle = ExportBundle {
        trades: state.store.list_trades(user.user_id).await?,
        playbooks: state.store.list_playbooks(user.user_id).await?,
        journal: state.store.list_journal(user.user_id).await?,
    };
    Ok(Json(bundle))
}

/// # POST /api/import
/// Every record gets a fresh id and trades are re-derived, so an export can be
/// imported repeatedly without collisions. Row `i` of each list is stamped `i`
/// microseconds before the first, so the bundle's newest-first order survives.
pub async fn import_data(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiJson(bundle): ApiJson<ImportBundle>,
) -> Result<Json<ImportSummary>, AppError> {
    let now = Utc::now();

    let trades = bundle
        .trades
        .into_iter()
        .enumerate()
        .map(|(i, input)| TradeRecord::derive(Uuid::new_v4(), input, stamp(now, i)))
        .collect::<Result<Vec<_>, _>>()?;
    let playbooks = bundle
        .playbooks
        .into_iter()
        .enumerate()
        .map(|(i, input)| Playbook::create(Uuid::new_v4(), input, stamp(now, i)))
        .collect::<Result<Vec<_>, _>>()?;
    let journal = bundle
        .journal
        .into_iter()
        .enumerate()
        .map(|(i, input)| JournalEntry::create(Uuid::new_v4(), input, stamp(now, i)))
        .collect::<Result<Vec<_>, _>>()?;

    state.store.import_records(user.user_id, &trades, &playbooks, &journal).await?;

    Ok(Json(ImportSummary { trades: trades.len(), playbooks: playbooks.len(), journal: journal.len() }))
}

fn stamp(now: DateTime<Utc>, row: usize) -> DateTime<Utc> {
    now - Duration::microseconds(row as i64)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetRequest {
    pub confirm: bool,
}

/// # POST /api/reset
/// Deletes every trade, playbook and journal entry of the caller.
pub async fn reset_data(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ResetRequest>,
) -> Result<StatusCode, AppError> {
    if !request.confirm {
        return Err(AppError::BadRequest("Reset requires {\"confirm\": true}".to_string()));
    }
    state.store.reset_user_data(user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
