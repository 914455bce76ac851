use crate::{
    error::AppError,
    extract::{ApiPath, CurrentUser},
    AppState,
};
use analytics::{build_report, compute_dashboard_metrics, recent_trades, DashboardMetrics, ReportKind, ReportSeries};
use axum::{extract::State, Json};
use core_types::TradeRecord;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub metrics: DashboardMetrics,
    pub recent_trades: Vec<TradeRecord>,
}

/// # GET /api/dashboard
/// Headline metrics, equity and drawdown curves, and the latest trades.
pub async fn get_dashboard(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, AppError> {
    let trades = state.store.list_trades(user.user_id).await?;
    let metrics = compute_dashboard_metrics(&trades);
    let recent_trades = recent_trades(&trades, state.config.dashboard.recent_trades_limit).to_vec();
    Ok(Json(DashboardResponse { metrics, recent_trades }))
}

/// # GET /api/reports/:kind
pub async fn get_report(
    user: CurrentUser,
    State(state): State<Arc<AppState>>,
    ApiPath(kind): ApiPath<String>,
) -> Result<Json<ReportSeries>, AppError> {
    let kind: ReportKind = kind.parse()?;
    let trades = state.store.list_trades(user.user_id).await?;
    Ok(Json(build_report(kind, &trades)))
}
