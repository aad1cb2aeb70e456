use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// A bucket-aligned query window in epoch seconds.
///
/// Both bounds are inclusive: the store filters on
/// `bucket_start_sec >= start_sec AND bucket_start_sec <= end_sec`, so a
/// window aligned to bucket boundaries returns exactly the buckets that
/// exist, without drift from "now" ticking during the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Window {
    pub start_sec: i64,
    pub end_sec: i64,
}

impl Window {
    /// An inverted window means no buckets can fall inside it. Produced
    /// when the lookback is shorter than one bucket; callers treat it as
    /// "expect zero results", not as an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_sec > self.end_sec
    }
}

/// Compute an aligned window for a bucketed series.
///
/// The end is snapped to the most recent bucket boundary and then pulled
/// `lag_buckets` whole buckets into the past, because the trailing bucket
/// may still be incompletely aggregated when queried.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for non-positive `lookback_sec` or
/// `bucket_sec`, or negative `lag_buckets`.
pub fn aligned_window(
    now_sec: i64,
    lookback_sec: i64,
    bucket_sec: i64,
    lag_buckets: i64,
) -> AppResult<Window> {
    if lookback_sec <= 0 {
        return Err(AppError::InvalidInput(format!(
            "lookback_sec must be positive, got {lookback_sec}"
        )));
    }
    if bucket_sec <= 0 {
        return Err(AppError::InvalidInput(format!(
            "bucket_sec must be positive, got {bucket_sec}"
        )));
    }
    if lag_buckets < 0 {
        return Err(AppError::InvalidInput(format!(
            "lag_buckets must not be negative, got {lag_buckets}"
        )));
    }

    let end_sec = now_sec.div_euclid(bucket_sec) * bucket_sec - lag_buckets * bucket_sec;
    let start_sec = end_sec - lookback_sec + bucket_sec;

    Ok(Window { start_sec, end_sec })
}

/// Raw readings are not bucket-aligned; they use a plain trailing window.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for non-positive `lookback_sec`.
pub fn raw_window(now_sec: i64, lookback_sec: i64) -> AppResult<Window> {
    if lookback_sec <= 0 {
        return Err(AppError::InvalidInput(format!(
            "lookback_sec must be positive, got {lookback_sec}"
        )));
    }

    Ok(Window {
        start_sec: now_sec - lookback_sec,
        end_sec: now_sec,
    })
}
