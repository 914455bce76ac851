use crate::{
    error::AppError,
    extract::{ApiPath, CurrentUser},
    AppState,
};
use axum::{body::Bytes, extract::State, Json};
use core_types::UserRole;
use curriculum::{apply_edit, effective, ContentEdit, ContentItem, CurriculumError, Section, UniversityView};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityResponse {
    #[serde(flatten)]
    pub view: UniversityView,
    pub can_edit: bool,
}

async fn role_of(state: &AppState, user: &CurrentUser) -> Result<UserRole, AppError> {
    let profile = state.store.get_profile(user.user_id).await?;
    Ok(profile.map(|p| p.role).unwrap_or_default())
}

/// Rejects non-administrators. Edit handlers call this before parsing the body.
async fn require_admin(state: &AppState, user: &CurrentUser) -> Result<UserRole, AppError> {
    let role = role_of(state, user).await?;
    if !role.is_admin() {
        tracing::warn!(user_id = %user.user_id, "Rejected education content edit from non-admin.");
        return Err(CurriculumError::Forbidden.into());
    }
    Ok(role)
}

async fn save_edit(
    state: &AppState,
    user: &CurrentUser,
    role: UserRole,
    edit: ContentEdit,
) -> Result<Json<UniversityResponse>, AppError> {
    let stored = state.store.load_university().await?;
    let content = apply_edit(stored, role, edit)?;
    state.store.save_university(&content).await?;
    tracing::info!(user_id = %user.user_id, "Education content updated.");

    Ok(Json(UniversityResponse { view: effective(Some(content)), can_edit: true }))
}

fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// # GET /api/university
pub async fn get_university(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UniversityResponse>, AppError> {
    let role = role_of(&state, &user).await?;
    let view = effective(state.store.load_university().await?);
    Ok(Json(UniversityResponse { view, can_edit: role.is_admin() }))
}

/// # POST /api/university/:section
pub async fn add_item(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(section): ApiPath<String>,
    body: Bytes,
) -> Result<Json<UniversityResponse>, AppError> {
    let role = require_admin(&state, &user).await?;
    let section: Section = section.parse()?;
    let item = ContentItem::from_json(section, parse_body(&body)?)?;
    save_edit(&state, &user, role, ContentEdit::Add(item)).await
}

/// # PUT /api/university/:section/:index
pub async fn update_item(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath((section, index)): ApiPath<(String, usize)>,
    body: Bytes,
) -> Result<Json<UniversityResponse>, AppError> {
    let role = require_admin(&state, &user).await?;
    let section: Section = section.parse()?;
    let item = ContentItem::from_json(section, parse_body(&body)?)?;
    save_edit(&state, &user, role, ContentEdit::Update { index, item }).await
}

/// # DELETE /api/university/:section/:index
pub async fn delete_item(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath((section, index)): ApiPath<(String, usize)>,
) -> Result<Json<UniversityResponse>, AppError> {
    let role = require_admin(&state, &user).await?;
    let section: Section = section.parse()?;
    save_edit(&state, &user, role, ContentEdit::Delete { section, index }).await
}
