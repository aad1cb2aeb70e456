//! Unit tests for the series module: window alignment, granularity
//! selection, downsampling, and axis labels.
//!
//! Run with: cargo test --test series_unit_test

use chrono::{TimeZone, Utc};

use saltwatch::series::granularity::{BUCKET_1H_SEC, BUCKET_5M_SEC};
use saltwatch::series::{aligned_window, downsample, label_for, raw_window, Granularity};

#[test]
fn aligned_window_snaps_to_bucket_boundaries() {
    // One day of hourly buckets, one bucket of lag
    let w = aligned_window(1_700_000_000, 86_400, BUCKET_1H_SEC, 1).unwrap();

    assert_eq!(w.end_sec % BUCKET_1H_SEC, 0);
    assert_eq!(w.start_sec % BUCKET_1H_SEC, 0);
    // Inclusive bounds: the window spans exactly lookback seconds of buckets
    assert_eq!(w.end_sec - w.start_sec + BUCKET_1H_SEC, 86_400);
    assert_eq!(w.end_sec - w.start_sec, 82_800);
    assert!(w.end_sec <= 1_700_000_000);
}

#[test]
fn aligned_window_lag_pulls_end_into_the_past() {
    let no_lag = aligned_window(1_700_000_000, 3_600, BUCKET_5M_SEC, 0).unwrap();
    let lagged = aligned_window(1_700_000_000, 3_600, BUCKET_5M_SEC, 1).unwrap();

    assert_eq!(no_lag.end_sec - lagged.end_sec, BUCKET_5M_SEC);
    assert_eq!(no_lag.start_sec - lagged.start_sec, BUCKET_5M_SEC);
}

#[test]
fn aligned_window_is_stable_within_one_bucket() {
    // "now" ticking inside the same bucket must not move the window
    let a = aligned_window(1_700_000_010, 86_400, BUCKET_1H_SEC, 1).unwrap();
    let b = aligned_window(1_700_002_000, 86_400, BUCKET_1H_SEC, 1).unwrap();
    assert_eq!(a, b);
}

#[test]
fn aligned_window_shorter_than_one_bucket_is_empty() {
    let w = aligned_window(1_700_000_000, 60, BUCKET_5M_SEC, 1).unwrap();
    assert!(w.is_empty());
}

#[test]
fn aligned_window_rejects_bad_input() {
    assert!(aligned_window(1_700_000_000, 0, BUCKET_1H_SEC, 1).is_err());
    assert!(aligned_window(1_700_000_000, -60, BUCKET_1H_SEC, 1).is_err());
    assert!(aligned_window(1_700_000_000, 3_600, 0, 1).is_err());
    assert!(aligned_window(1_700_000_000, 3_600, BUCKET_1H_SEC, -1).is_err());
}

#[test]
fn raw_window_is_a_plain_trailing_range() {
    let w = raw_window(1_700_000_000, 1_800).unwrap();
    assert_eq!(w.start_sec, 1_699_998_200);
    assert_eq!(w.end_sec, 1_700_000_000);
    assert!(raw_window(1_700_000_000, 0).is_err());
}

#[test]
fn granularity_selection_boundaries() {
    assert_eq!(Granularity::select(300, None), Granularity::Raw);
    assert_eq!(Granularity::select(1_800, None), Granularity::Raw);
    assert_eq!(Granularity::select(1_801, None), Granularity::FiveMinute);
    assert_eq!(Granularity::select(86_399, None), Granularity::FiveMinute);
    assert_eq!(Granularity::select(86_400, None), Granularity::Hourly);
    assert_eq!(Granularity::select(7 * 86_400, None), Granularity::Hourly);
}

#[test]
fn granularity_forced_override_wins() {
    // The dashboard forces raw for short live views regardless of the rule
    assert_eq!(
        Granularity::select(7 * 86_400, Some(Granularity::Raw)),
        Granularity::Raw
    );
    assert_eq!(
        Granularity::select(300, Some(Granularity::Hourly)),
        Granularity::Hourly
    );
}

#[test]
fn granularity_collections_and_parsing() {
    assert_eq!(Granularity::Raw.collection(), "readings");
    assert_eq!(Granularity::FiveMinute.collection(), "stats_5m");
    assert_eq!(Granularity::Hourly.collection(), "stats_hourly");

    assert_eq!("raw".parse::<Granularity>().unwrap(), Granularity::Raw);
    assert_eq!("5m".parse::<Granularity>().unwrap(), Granularity::FiveMinute);
    assert_eq!(
        "hourly".parse::<Granularity>().unwrap(),
        Granularity::Hourly
    );
    assert!("daily".parse::<Granularity>().is_err());
}

#[test]
fn downsample_identity_when_under_budget() {
    let points: Vec<i64> = (0..100).collect();
    assert_eq!(downsample(&points, 360).unwrap(), points);
    assert_eq!(downsample(&points, 100).unwrap(), points);
}

#[test]
fn downsample_keeps_endpoints_and_respects_budget() {
    let points: Vec<i64> = (0..1_000).collect();
    let out = downsample(&points, 360).unwrap();

    // ceil(1000/360) = 3, so every third point plus the forced last
    assert_eq!(out.first(), Some(&0));
    assert_eq!(out.last(), Some(&999));
    assert!(out.len() <= 361);
    assert_eq!(out[1], 3);

    // Output stays ascending (a subsequence of the input)
    assert!(out.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn downsample_is_idempotent() {
    let points: Vec<i64> = (0..1_000).collect();
    let once = downsample(&points, 360).unwrap();
    let twice = downsample(&once, 360).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn downsample_edge_cases() {
    let empty: Vec<i64> = Vec::new();
    assert!(downsample(&empty, 360).unwrap().is_empty());
    assert_eq!(downsample(&[42], 360).unwrap(), vec![42]);
    assert_eq!(downsample(&[1, 2, 3, 4, 5], 1).unwrap(), vec![1, 5]);
    assert!(downsample(&[1, 2, 3], 0).is_err());
}

#[test]
fn label_granularity_follows_lookback() {
    let ts = Utc.with_ymd_and_hms(2025, 3, 7, 14, 30, 0).unwrap();

    // Up to 2 days: time of day
    assert_eq!(label_for(ts, 3_600), "14:30");
    assert_eq!(label_for(ts, 2 * 86_400), "14:30");
    // Up to 45 days: day/month
    assert_eq!(label_for(ts, 2 * 86_400 + 1), "07/03");
    assert_eq!(label_for(ts, 40 * 86_400), "07/03");
    // Beyond: month/year
    assert_eq!(label_for(ts, 100 * 86_400), "03/2025");
}

#[test]
fn tooltip_label_is_full_timestamp() {
    let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
    assert_eq!(saltwatch::series::tooltip_label(ts), "07/03/2025 09:05");
}
