//! Unit tests for status classification and snapshot field resolution.
//!
//! Run with: cargo test --test status_unit_test

use saltwatch::status::{classify, is_offline, status_text, DeviceStatus, Thresholds};
use saltwatch::store::models::LatestSnapshot;

const NOW: i64 = 1_700_000_000;

fn fresh(salinity: f64, ph: f64, temperature: f64, battery_pct: f64) -> LatestSnapshot {
    LatestSnapshot {
        salinity: Some(salinity),
        ph: Some(ph),
        temperature: Some(temperature),
        battery_pct: Some(battery_pct),
        updated_at: Some(NOW - 30),
        ..Default::default()
    }
}

#[test]
fn normal_when_everything_in_band() {
    let t = Thresholds::default();
    let snap = fresh(10.0, 7.5, 28.0, 80.0);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::Normal);
    assert_eq!(status_text(Some(&snap), NOW, &t), "Normal");
}

#[test]
fn band_bounds_are_exclusive() {
    let t = Thresholds::default();
    // Sitting exactly on a bound is normal
    let snap = fresh(12.0, 8.5, 32.0, 80.0);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::Normal);
    let snap = fresh(8.0, 6.5, 25.0, 80.0);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::Normal);
}

#[test]
fn classification_priority_order() {
    let t = Thresholds::default();

    // Everything out of range at once: salinity wins
    let snap = fresh(15.0, 9.0, 40.0, 5.0);
    assert_eq!(
        classify(Some(&snap), NOW, &t),
        DeviceStatus::AbnormalSalinity
    );

    // Salinity normal: battery beats temperature and pH
    let snap = fresh(10.0, 9.0, 40.0, 5.0);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::LowBattery);

    // Battery normal: temperature beats pH
    let snap = fresh(10.0, 9.0, 40.0, 80.0);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::WarningTemp);

    let snap = fresh(10.0, 9.0, 28.0, 80.0);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::WarningPh);
}

#[test]
fn battery_comparator_is_configurable() {
    let inclusive = Thresholds::default();
    assert!(inclusive.battery_is_low(20.0));
    assert!(!inclusive.battery_is_low(20.1));

    let exclusive = Thresholds {
        battery_low_inclusive: false,
        ..Default::default()
    };
    assert!(!exclusive.battery_is_low(20.0));
    assert!(exclusive.battery_is_low(19.9));
}

#[test]
fn missing_metrics_never_trip_thresholds() {
    let t = Thresholds::default();
    let snap = LatestSnapshot {
        updated_at: Some(NOW - 30),
        ..Default::default()
    };
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::Normal);
}

#[test]
fn offline_rules() {
    let t = Thresholds::default();

    // No snapshot at all
    assert!(is_offline(None, NOW, &t));

    // Stale update: older than 10 minutes
    let stale = LatestSnapshot {
        updated_at: Some(NOW - 601),
        ..Default::default()
    };
    assert!(is_offline(Some(&stale), NOW, &t));

    // Exactly at the timeout is still online
    let edge = LatestSnapshot {
        updated_at: Some(NOW - 600),
        ..Default::default()
    };
    assert!(!is_offline(Some(&edge), NOW, &t));

    // Explicit backend marker wins even when fresh
    let marked = LatestSnapshot {
        status: Some("offline".to_string()),
        updated_at: Some(NOW - 10),
        ..Default::default()
    };
    assert!(is_offline(Some(&marked), NOW, &t));

    // No timestamp at all is trusted as online
    let no_ts = LatestSnapshot::default();
    assert!(!is_offline(Some(&no_ts), NOW, &t));
}

#[test]
fn offline_beats_every_other_condition() {
    let t = Thresholds::default();
    let mut snap = fresh(15.0, 9.0, 40.0, 5.0);
    snap.updated_at = Some(NOW - 3_600);
    assert_eq!(classify(Some(&snap), NOW, &t), DeviceStatus::Offline);
    assert_eq!(status_text(Some(&snap), NOW, &t), "Offline");
}

#[test]
fn status_text_lists_every_tripped_condition() {
    let t = Thresholds::default();
    let snap = fresh(15.0, 9.0, 40.0, 5.0);
    assert_eq!(
        status_text(Some(&snap), NOW, &t),
        "Salinity high • pH high • Temperature high • Battery low"
    );

    let snap = fresh(5.0, 5.0, 28.0, 80.0);
    assert_eq!(status_text(Some(&snap), NOW, &t), "Salinity low • pH low");
}

#[test]
fn battery_voltage_resolves_first_present_alias() {
    let snap = LatestSnapshot {
        avg_battery_voltage: Some(3.9),
        voltage: Some(3.5),
        ..Default::default()
    };
    assert_eq!(snap.resolve_battery_voltage(), Some(3.9));

    // batteryVolt wins over everything else
    let snap = LatestSnapshot {
        battery_volt: Some(4.1),
        avg_voltage: Some(3.7),
        ..Default::default()
    };
    assert_eq!(snap.resolve_battery_voltage(), Some(4.1));

    // A placeholder 0.0 is skipped in favor of a later real reading
    let snap = LatestSnapshot {
        battery_volt: Some(0.0),
        voltage: Some(3.6),
        ..Default::default()
    };
    assert_eq!(snap.resolve_battery_voltage(), Some(3.6));

    let all_zero = LatestSnapshot {
        battery_volt: Some(0.0),
        ..Default::default()
    };
    assert_eq!(all_zero.resolve_battery_voltage(), None);

    assert_eq!(LatestSnapshot::default().resolve_battery_voltage(), None);
}

#[test]
fn last_update_prefers_updated_at() {
    let snap = LatestSnapshot {
        updated_at: Some(100),
        measured_at: Some(50),
        ..Default::default()
    };
    assert_eq!(snap.last_update_sec(), Some(100));

    let snap = LatestSnapshot {
        measured_at: Some(50),
        ..Default::default()
    };
    assert_eq!(snap.last_update_sec(), Some(50));
}

#[test]
fn snapshot_deserializes_camel_case_aliases() {
    let snap: LatestSnapshot = serde_json::from_str(
        r#"{"salinity": 9.5, "batteryPct": 64.0, "avgBatteryVolt": 3.8, "updatedAt": 1700000000}"#,
    )
    .unwrap();
    assert_eq!(snap.salinity, Some(9.5));
    assert_eq!(snap.battery_pct, Some(64.0));
    assert_eq!(snap.resolve_battery_voltage(), Some(3.8));
    assert_eq!(snap.last_update_sec(), Some(1_700_000_000));
}
