use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::AppResult;
use crate::refresh::alerts::AlertLine;
use crate::routes::devices::current_snapshot;

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsResponse {
    pub refreshed_at: DateTime<Utc>,
    /// Non-empty alert lines in display order: salinity, pH, battery,
    /// offline
    pub lines: Vec<AlertLine>,
}

/// Get the dashboard alert lines from the current snapshot
#[utoipa::path(
    get,
    path = "/api/dashboard/alerts",
    responses(
        (status = 200, description = "Alerts retrieved successfully", body = AlertsResponse),
        (status = 503, description = "First refresh cycle not completed"),
    ),
    tag = "dashboard"
)]
pub async fn get_alerts(State(state): State<AppState>) -> AppResult<Json<AlertsResponse>> {
    let snapshot = current_snapshot(&state).await?;

    Ok(Json(AlertsResponse {
        refreshed_at: snapshot.refreshed_at,
        lines: snapshot.alerts.lines(&state.config.thresholds),
    }))
}
