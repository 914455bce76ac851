use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, CurrentUser},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use core_types::{JournalEntry, JournalInput, Playbook, PlaybookInput};
use std::sync::Arc;
use uuid::Uuid;

// --- Playbooks ---

/// # GET /api/playbooks
pub async fn list_playbooks(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Playbook>>, AppError> {
    Ok(Json(state.store.list_playbooks(user.user_id).await?))
}

/// # POST /api/playbooks
pub async fn create_playbook(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<PlaybookInput>,
) -> Result<(StatusCode, Json<Playbook>), AppError> {
    let playbook = Playbook::create(Uuid::new_v4(), input, Utc::now())?;
    state.store.insert_playbook(user.user_id, &playbook).await?;
    tracing::info!(user_id = %user.user_id, playbook_id = %playbook.id, "Playbook created.");
    Ok((StatusCode::CREATED, Json(playbook)))
}

/// # DELETE /api/playbooks/:id
pub async fn delete_playbook(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(playbook_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_playbook(user.user_id, playbook_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Journal ---

/// # GET /api/journal
pub async fn list_journal(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    Ok(Json(state.store.list_journal(user.user_id).await?))
}

/// # POST /api/journal
pub async fn create_journal_entry(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<JournalInput>,
) -> Result<(StatusCode, Json<JournalEntry>), AppError> {
    let entry = JournalEntry::create(Uuid::new_v4(), input, Utc::now())?;
    state.store.insert_journal(user.user_id, &entry).await?;
    tracing::info!(user_id = %user.user_id, entry_id = %entry.id, "Journal entry created.");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// # DELETE /api/journal/:id
pub async fn delete_journal_entry(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(entry_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_journal(user.user_id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
