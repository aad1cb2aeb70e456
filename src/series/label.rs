use chrono::{DateTime, Utc};

/// Two days: below this, axis labels show time of day
const HM_MAX_LOOKBACK_SEC: i64 = 2 * 86_400;
/// 45 days: below this, axis labels show day/month
const DM_MAX_LOOKBACK_SEC: i64 = 45 * 86_400;

/// Axis label for a point, with granularity chosen from the lookback that
/// fetched it: `HH:MM` up to 2 days, `DD/MM` up to 45 days, `MM/YYYY`
/// beyond.
#[must_use]
pub fn label_for(ts: DateTime<Utc>, lookback_sec: i64) -> String {
    if lookback_sec <= HM_MAX_LOOKBACK_SEC {
        ts.format("%H:%M").to_string()
    } else if lookback_sec <= DM_MAX_LOOKBACK_SEC {
        ts.format("%d/%m").to_string()
    } else {
        ts.format("%m/%Y").to_string()
    }
}

/// Full `DD/MM/YYYY HH:MM` timestamp for tooltips and table rows.
#[must_use]
pub fn tooltip_label(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}
