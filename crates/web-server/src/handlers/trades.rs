use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, CurrentUser},
    AppState,
};
use analytics::{OutcomeFilter, TradeQuery};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use core_types::{TradeInput, TradeRecord};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Query string of the trade list. Both parameters are optional.
#[derive(Debug, Default, Deserialize)]
pub struct TradeListParams {
    pub search: Option<String>,
    pub filter: Option<String>,
}

impl TradeListParams {
    fn into_query(self) -> Result<TradeQuery, AppError> {
        let filter = match self.filter.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse()?,
            _ => OutcomeFilter::default(),
        };
        Ok(TradeQuery { search: self.search, filter })
    }
}

/// # GET /api/trades?search=&filter=
pub async fn list_trades(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<TradeListParams>,
) -> Result<Json<Vec<TradeRecord>>, AppError> {
    let query = params.into_query()?;
    let trades = state.store.list_trades(user.user_id).await?;
    Ok(Json(query.apply(&trades).into_iter().cloned().collect()))
}

/// # POST /api/trades
pub async fn create_trade(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<TradeInput>,
) -> Result<(StatusCode, Json<TradeRecord>), AppError> {
    let trade = TradeRecord::derive(Uuid::new_v4(), input, Utc::now())?;
    state.store.insert_trade(user.user_id, &trade).await?;
    tracing::info!(user_id = %user.user_id, trade_id = %trade.id, symbol = %trade.symbol, pl = %trade.pl, "Trade recorded.");
    Ok((StatusCode::CREATED, Json(trade)))
}

/// # GET /api/trades/:id
pub async fn get_trade(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(trade_id): ApiPath<Uuid>,
) -> Result<Json<TradeRecord>, AppError> {
    Ok(Json(state.store.get_trade(user.user_id, trade_id).await?))
}

/// # PUT /api/trades/:id
/// Replaces every user-editable field and re-derives P/L, R-multiple and outcome.
pub async fn update_trade(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(trade_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<TradeInput>,
) -> Result<Json<TradeRecord>, AppError> {
    let existing = state.store.get_trade(user.user_id, trade_id).await?;
    let updated = existing.rederive(input, Utc::now())?;
    state.store.replace_trade(user.user_id, &updated).await?;
    tracing::info!(user_id = %user.user_id, %trade_id, "Trade updated.");
    Ok(Json(updated))
}

/// # DELETE /api/trades/:id
pub async fn delete_trade(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(trade_id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_trade(user.user_id, trade_id).await?;
    tracing::info!(user_id = %user.user_id, %trade_id, "Trade deleted.");
    Ok(StatusCode::NO_CONTENT)
}
