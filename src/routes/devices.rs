use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::refresh::cycle::{DeviceEntry, RenderSnapshot};
use crate::series::tooltip_label;
use crate::status::{status_text, DeviceStatus};

/// One row of the device overview table.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceRow {
    pub id: String,
    pub name: String,
    pub location: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub salinity: Option<f64>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub battery_pct: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub status: DeviceStatus,
    pub status_text: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DevicesResponse {
    pub refreshed_at: DateTime<Utc>,
    pub devices: Vec<DeviceRow>,
}

/// KPI card payload for a single device.
#[derive(Debug, Serialize, ToSchema)]
pub struct KpiResponse {
    pub id: String,
    pub name: String,
    pub salinity: Option<f64>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub battery_pct: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub status: DeviceStatus,
    pub status_text: String,
    pub updated_at: Option<DateTime<Utc>>,
    /// Pre-formatted "DD/MM/YYYY HH:MM" update stamp, "--" when unknown
    pub updated_text: String,
}

fn epoch_to_utc(sec: Option<i64>) -> Option<DateTime<Utc>> {
    sec.and_then(|s| Utc.timestamp_opt(s, 0).single())
}

fn device_row(entry: &DeviceEntry, now_sec: i64, state: &AppState) -> DeviceRow {
    let latest = entry.latest.as_ref();
    DeviceRow {
        id: entry.meta.id.clone(),
        name: entry.meta.name.clone(),
        location: entry.meta.location.clone(),
        lat: entry.meta.lat,
        lng: entry.meta.lng,
        salinity: latest.and_then(|l| l.salinity),
        temperature: latest.and_then(|l| l.temperature),
        ph: latest.and_then(|l| l.ph),
        battery_pct: latest.and_then(|l| l.battery_pct),
        battery_voltage: latest.and_then(|l| l.resolve_battery_voltage()),
        status: entry.status,
        status_text: status_text(latest, now_sec, &state.config.thresholds),
        updated_at: epoch_to_utc(latest.and_then(|l| l.last_update_sec())),
    }
}

/// Fetch the published snapshot, or 503 before the first cycle completes.
pub async fn current_snapshot(state: &AppState) -> AppResult<RenderSnapshot> {
    let snapshot = state.snapshot.read().await.clone();
    if snapshot.generation == 0 {
        return Err(AppError::ServiceUnavailable(
            "First refresh cycle has not completed yet".to_string(),
        ));
    }
    Ok(snapshot)
}

/// List all devices with their latest readings and status
#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "Devices retrieved successfully", body = DevicesResponse),
        (status = 503, description = "First refresh cycle not completed"),
    ),
    tag = "devices"
)]
pub async fn list_devices(State(state): State<AppState>) -> AppResult<Json<DevicesResponse>> {
    let snapshot = current_snapshot(&state).await?;
    let now_sec = Utc::now().timestamp();

    let devices = snapshot
        .devices
        .iter()
        .map(|entry| device_row(entry, now_sec, &state))
        .collect();

    Ok(Json(DevicesResponse {
        refreshed_at: snapshot.refreshed_at,
        devices,
    }))
}

/// Get a single device row
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
    ),
    responses(
        (status = 200, description = "Device retrieved successfully", body = DeviceRow),
        (status = 404, description = "Device not found"),
    ),
    tag = "devices"
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<Json<DeviceRow>> {
    let snapshot = current_snapshot(&state).await?;
    let now_sec = Utc::now().timestamp();

    let entry = snapshot
        .device(&device_id)
        .ok_or_else(|| AppError::NotFound(format!("Device '{device_id}' not found")))?;

    Ok(Json(device_row(entry, now_sec, &state)))
}

/// Get the KPI card payload for a device
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}/kpis",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
    ),
    responses(
        (status = 200, description = "KPIs retrieved successfully", body = KpiResponse),
        (status = 404, description = "Device not found"),
    ),
    tag = "devices"
)]
pub async fn get_device_kpis(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<Json<KpiResponse>> {
    let snapshot = current_snapshot(&state).await?;
    let now_sec = Utc::now().timestamp();

    let entry = snapshot
        .device(&device_id)
        .ok_or_else(|| AppError::NotFound(format!("Device '{device_id}' not found")))?;

    let latest = entry.latest.as_ref();
    let updated_at = epoch_to_utc(latest.and_then(|l| l.last_update_sec()));

    Ok(Json(KpiResponse {
        id: entry.meta.id.clone(),
        name: entry.meta.name.clone(),
        salinity: latest.and_then(|l| l.salinity),
        temperature: latest.and_then(|l| l.temperature),
        ph: latest.and_then(|l| l.ph),
        battery_pct: latest.and_then(|l| l.battery_pct),
        battery_voltage: latest.and_then(|l| l.resolve_battery_voltage()),
        status: entry.status,
        status_text: status_text(latest, now_sec, &state.config.thresholds),
        updated_at,
        updated_text: updated_at.map_or_else(|| "--".to_string(), tooltip_label),
    }))
}
