//! Unit tests for the dashboard alert summary.
//!
//! Run with: cargo test --test alerts_unit_test

use saltwatch::refresh::alerts::AlertSummary;
use saltwatch::refresh::cycle::DeviceEntry;
use saltwatch::refresh::meta::device_meta;
use saltwatch::status::{classify, Thresholds};
use saltwatch::store::models::LatestSnapshot;

const NOW: i64 = 1_700_000_000;

fn entry(id: &str, latest: Option<LatestSnapshot>) -> DeviceEntry {
    let thresholds = Thresholds::default();
    let status = classify(latest.as_ref(), NOW, &thresholds);
    DeviceEntry {
        meta: device_meta(id),
        latest,
        status,
    }
}

fn fresh(salinity: f64, ph: f64, battery_pct: f64) -> LatestSnapshot {
    LatestSnapshot {
        salinity: Some(salinity),
        ph: Some(ph),
        battery_pct: Some(battery_pct),
        updated_at: Some(NOW - 30),
        ..Default::default()
    }
}

#[test]
fn devices_group_onto_their_alert_lines() {
    let t = Thresholds::default();
    let entries = vec![
        entry("bien_hoa", Some(fresh(15.0, 7.5, 80.0))),
        entry("binh_duong", Some(fresh(5.0, 7.5, 80.0))),
        entry("demo_1", Some(fresh(10.0, 9.2, 10.0))),
        entry("demo_2", Some(fresh(10.0, 7.5, 80.0))),
    ];

    let summary = AlertSummary::build(&entries, NOW, &t);
    assert_eq!(summary.salinity_high.len(), 1);
    assert_eq!(summary.salinity_high[0].id, "bien_hoa");
    assert_eq!(summary.salinity_low.len(), 1);
    assert_eq!(summary.ph_high.len(), 1);
    assert_eq!(summary.battery_low.len(), 1);
    assert!(summary.offline.is_empty());
}

#[test]
fn one_device_can_appear_on_several_lines() {
    // Unlike the single-status classification, the alert bar shows every
    // condition the device is in
    let t = Thresholds::default();
    let entries = vec![entry("demo_1", Some(fresh(15.0, 9.2, 10.0)))];

    let summary = AlertSummary::build(&entries, NOW, &t);
    assert_eq!(summary.salinity_high.len(), 1);
    assert_eq!(summary.ph_high.len(), 1);
    assert_eq!(summary.battery_low.len(), 1);
}

#[test]
fn offline_devices_appear_only_on_the_offline_line() {
    let t = Thresholds::default();
    let mut snap = fresh(15.0, 9.2, 10.0);
    snap.updated_at = Some(NOW - 3_600);
    let entries = vec![entry("demo_1", Some(snap))];

    let summary = AlertSummary::build(&entries, NOW, &t);
    assert!(summary.salinity_high.is_empty());
    assert!(summary.ph_high.is_empty());
    assert!(summary.battery_low.is_empty());
    assert_eq!(summary.offline.len(), 1);
}

#[test]
fn devices_without_snapshots_are_skipped() {
    let t = Thresholds::default();
    let entries = vec![entry("demo_1", None)];

    let summary = AlertSummary::build(&entries, NOW, &t);
    assert!(summary.offline.is_empty());
    assert!(summary.lines(&t).is_empty());
}

#[test]
fn lines_render_in_display_order_and_skip_empty() {
    let t = Thresholds::default();
    let entries = vec![
        entry("bien_hoa", Some(fresh(15.0, 7.5, 80.0))),
        entry("demo_1", Some(fresh(10.0, 7.5, 10.0))),
    ];

    let lines = AlertSummary::build(&entries, NOW, &t).lines(&t);
    let labels: Vec<&str> = lines.iter().map(|l| l.label).collect();
    assert_eq!(labels, vec!["Salinity", "Battery"]);

    assert_eq!(lines[0].message, "Bien Hoa salinity above range.");
    assert_eq!(
        lines[1].message,
        "Demo Long Xuyen battery at or below 20%."
    );
}

#[test]
fn two_sided_lines_merge_high_and_low() {
    let t = Thresholds::default();
    let entries = vec![
        entry("bien_hoa", Some(fresh(15.0, 7.5, 80.0))),
        entry("binh_duong", Some(fresh(5.0, 7.5, 80.0))),
    ];

    let lines = AlertSummary::build(&entries, NOW, &t).lines(&t);
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].message,
        "Bien Hoa salinity above range; Binh Duong salinity below range."
    );
    assert_eq!(lines[0].devices.len(), 2);
}

#[test]
fn battery_message_tracks_comparator() {
    let t = Thresholds {
        battery_low_inclusive: false,
        ..Default::default()
    };
    let entries = vec![entry("demo_1", Some(fresh(10.0, 7.5, 10.0)))];

    let lines = AlertSummary::build(&entries, NOW, &t).lines(&t);
    assert_eq!(lines[0].message, "Demo Long Xuyen battery below 20%.");
}

#[test]
fn offline_line_message() {
    let t = Thresholds::default();
    let mut snap = fresh(10.0, 7.5, 80.0);
    snap.updated_at = Some(NOW - 3_600);
    let entries = vec![entry("bien_hoa", Some(snap))];

    let lines = AlertSummary::build(&entries, NOW, &t).lines(&t);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].label, "Offline");
    assert_eq!(lines[0].message, "Bien Hoa disconnected.");
}
