use axum::{
    extract::{Path, Query, State},
    http::{
        header::{self, HeaderMap, HeaderValue},
        StatusCode,
    },
    response::Response,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::series::{aligned_window, downsample, label_for, raw_window, Granularity, Window};
use crate::store::models::SeriesPoint;

/// Global semaphore limiting concurrent CSV export requests.
static BULK_SEMAPHORE: std::sync::LazyLock<Arc<Semaphore>> = std::sync::LazyLock::new(|| {
    let limit = std::env::var("BULK_CONCURRENT_LIMIT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    Arc::new(Semaphore::new(limit))
});

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SeriesQuery {
    /// History duration ending at now, in seconds (required)
    pub lookback_sec: i64,
    /// Force a resolution tier: raw, 5m, hourly (optional)
    pub source: Option<String>,
    /// Response format: json (default), csv
    #[serde(default = "default_format")]
    pub format: String,
}

/// One downsampled plot point with its pre-computed axis label.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlotPoint {
    pub bucket_start_sec: i64,
    pub time: DateTime<Utc>,
    /// Axis label with granularity matched to the lookback
    pub label: String,
    pub avg_salinity: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub avg_ph: Option<f64>,
    pub avg_battery_pct: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesResponse {
    pub device_id: String,
    pub granularity: Granularity,
    pub lookback_sec: i64,
    pub window: Window,
    /// At most max_plot_points + 1 points, endpoints preserved
    pub points: Vec<PlotPoint>,
}

fn determine_format(query_format: &str, headers: &HeaderMap) -> String {
    if query_format != "json" {
        return query_format.to_lowercase();
    }

    if let Some(accept) = headers.get(header::ACCEPT)
        && let Ok(accept_str) = accept.to_str()
        && accept_str.contains("text/csv")
    {
        return "csv".to_string();
    }

    "json".to_string()
}

fn fmt_metric(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) => format!("{x:.decimals$}"),
        None => "--".to_string(),
    }
}

/// Build the CSV export. All fields are double-quoted with internal quotes
/// doubled; the header matches the dashboard's history-table export.
fn build_csv_response(points: &[PlotPoint]) -> AppResult<Response> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record([
            "Time",
            "Date",
            "Salinity(\u{2030})",
            "pH",
            "Temperature(\u{b0}C)",
            "Battery(%)",
        ])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    for point in points {
        writer
            .write_record([
                point.time.format("%H:%M").to_string(),
                point.time.format("%d/%m/%Y").to_string(),
                fmt_metric(point.avg_salinity, 1),
                fmt_metric(point.avg_ph, 2),
                fmt_metric(point.avg_temperature, 1),
                fmt_metric(point.avg_battery_pct, 0),
            ])
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(axum::body::Body::from(data))
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn plot_points(points: Vec<SeriesPoint>, lookback_sec: i64) -> Vec<PlotPoint> {
    points
        .into_iter()
        .filter_map(|p| {
            let time = Utc.timestamp_opt(p.bucket_start_sec, 0).single()?;
            Some(PlotPoint {
                bucket_start_sec: p.bucket_start_sec,
                label: label_for(time, lookback_sec),
                time,
                avg_salinity: p.avg_salinity,
                avg_temperature: p.avg_temperature,
                avg_ph: p.avg_ph,
                avg_battery_pct: p.avg_battery_pct,
            })
        })
        .collect()
}

/// Get a downsampled series for a device
///
/// Resolves the resolution tier from the lookback (or the explicit source
/// override), computes the bucket-aligned window, queries the store, and
/// downsamples to the configured plot budget. Supports JSON and CSV.
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}/series",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
        SeriesQuery
    ),
    responses(
        (status = 200, description = "Series retrieved successfully", body = SeriesResponse),
        (status = 400, description = "Invalid lookback or source"),
    ),
    tag = "series"
)]
pub async fn get_device_series(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Query(query): Query<SeriesQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    use super::cache;

    if query.lookback_sec <= 0 {
        return Err(AppError::BadRequest(format!(
            "lookback_sec must be positive, got {}",
            query.lookback_sec
        )));
    }

    let max_lookback_sec = state.config.max_lookback_days * 86_400;
    if query.lookback_sec > max_lookback_sec {
        return Err(AppError::BadRequest(format!(
            "lookback exceeds maximum of {} days",
            state.config.max_lookback_days
        )));
    }

    let forced = query
        .source
        .as_deref()
        .map(str::parse::<Granularity>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let granularity = Granularity::select(query.lookback_sec, forced);

    let format = determine_format(&query.format, &headers);

    let cache_key = cache::cache_key(
        "series",
        &[
            &device_id,
            &query.lookback_sec.to_string(),
            granularity.as_str(),
            &format,
        ],
    );

    if format == "json" {
        if let Some(cached) = cache::get_cached(&state, &cache_key).await {
            return cache::json_response((*cached).to_vec(), true);
        }
    }

    // CSV exports compete for a bounded number of slots
    let _permit = if format == "csv" {
        match BULK_SEMAPHORE.clone().try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(_) => {
                tracing::warn!(
                    format = %format,
                    status = StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                    "bulk_request_rejected"
                );
                return Err(AppError::ServiceUnavailable(
                    "Too many concurrent export requests. Please try again later.".to_string(),
                ));
            }
        }
    } else {
        None
    };

    let now_sec = Utc::now().timestamp();
    let window = match granularity.bucket_sec() {
        Some(bucket_sec) => aligned_window(
            now_sec,
            query.lookback_sec,
            bucket_sec,
            state.config.window_lag_buckets,
        )?,
        None => raw_window(now_sec, query.lookback_sec)?,
    };

    // An inverted window is "no data expected", not an error; the store
    // client short-circuits it to an empty series
    let points = state
        .store
        .query_series(&device_id, granularity, window, query.lookback_sec)
        .await?;

    let slim = downsample(&points, state.config.max_plot_points)?;
    let points = plot_points(slim, query.lookback_sec);

    tracing::debug!(
        device = %device_id,
        granularity = granularity.as_str(),
        points = points.len(),
        "series_resolved"
    );

    match format.as_str() {
        "csv" => build_csv_response(&points),
        _ => {
            let response = SeriesResponse {
                device_id,
                granularity,
                lookback_sec: query.lookback_sec,
                window,
                points,
            };
            cache::cache_and_respond(&state, cache_key, &response).await
        }
    }
}
