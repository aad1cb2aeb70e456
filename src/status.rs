//! Threshold-based status classification for the latest device snapshot.

use serde::Serialize;
use utoipa::ToSchema;

use crate::store::models::LatestSnapshot;

/// Alert thresholds for the water-quality metrics.
///
/// Band comparisons are exclusive: a reading sitting exactly on a bound is
/// normal. The battery comparator is configurable because deployments have
/// historically disagreed on whether exactly 20% counts as low;
/// `battery_low_inclusive = true` (the default) treats it as low.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Salinity normal band, in per mille
    pub salinity_low: f64,
    pub salinity_high: f64,
    /// pH normal band
    pub ph_low: f64,
    pub ph_high: f64,
    /// Temperature normal band, in degrees Celsius
    pub temperature_low: f64,
    pub temperature_high: f64,
    /// Battery percentage at or below which the device is low
    pub battery_low_pct: f64,
    /// Whether `battery_low_pct` itself counts as low (`<=` vs `<`)
    pub battery_low_inclusive: bool,
    /// Seconds without an update before a device is considered offline
    pub offline_after_secs: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            salinity_low: 8.0,
            salinity_high: 12.0,
            ph_low: 6.5,
            ph_high: 8.5,
            temperature_low: 25.0,
            temperature_high: 32.0,
            battery_low_pct: 20.0,
            battery_low_inclusive: true,
            offline_after_secs: 10 * 60,
        }
    }
}

impl Thresholds {
    #[must_use]
    pub fn battery_is_low(&self, pct: f64) -> bool {
        if self.battery_low_inclusive {
            pct <= self.battery_low_pct
        } else {
            pct < self.battery_low_pct
        }
    }
}

/// Aggregate device state, highest-priority condition only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceStatus {
    Normal,
    AbnormalSalinity,
    LowBattery,
    WarningTemp,
    WarningPh,
    Offline,
}

impl DeviceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Normal => "normal",
            DeviceStatus::AbnormalSalinity => "abnormal-salinity",
            DeviceStatus::LowBattery => "low-battery",
            DeviceStatus::WarningTemp => "warning-temp",
            DeviceStatus::WarningPh => "warning-ph",
            DeviceStatus::Offline => "offline",
        }
    }
}

/// A device is offline when the backend explicitly marks it, or when its
/// last update is older than the configured timeout. A snapshot with no
/// timestamp at all is trusted as online (the backend may strip the field).
#[must_use]
pub fn is_offline(latest: Option<&LatestSnapshot>, now_sec: i64, thresholds: &Thresholds) -> bool {
    let Some(latest) = latest else {
        return true;
    };

    if latest
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("OFFLINE"))
    {
        return true;
    }

    match latest.last_update_sec() {
        Some(t) => now_sec - t > thresholds.offline_after_secs,
        None => false,
    }
}

/// Classify a device from its latest snapshot. Priority: offline, then
/// salinity, battery, temperature, pH. Missing metrics never trip a
/// threshold.
#[must_use]
pub fn classify(
    latest: Option<&LatestSnapshot>,
    now_sec: i64,
    thresholds: &Thresholds,
) -> DeviceStatus {
    if is_offline(latest, now_sec, thresholds) {
        return DeviceStatus::Offline;
    }
    // is_offline returned false, so latest is present
    let Some(latest) = latest else {
        return DeviceStatus::Offline;
    };

    if let Some(sal) = latest.salinity {
        if sal > thresholds.salinity_high || sal < thresholds.salinity_low {
            return DeviceStatus::AbnormalSalinity;
        }
    }

    if let Some(bat) = latest.battery_pct {
        if thresholds.battery_is_low(bat) {
            return DeviceStatus::LowBattery;
        }
    }

    if let Some(temp) = latest.temperature {
        if temp > thresholds.temperature_high || temp < thresholds.temperature_low {
            return DeviceStatus::WarningTemp;
        }
    }

    if let Some(ph) = latest.ph {
        if ph > thresholds.ph_high || ph < thresholds.ph_low {
            return DeviceStatus::WarningPh;
        }
    }

    DeviceStatus::Normal
}

/// Human-readable status line listing every tripped condition, not just
/// the highest-priority one. Used for the KPI card and the device table.
#[must_use]
pub fn status_text(
    latest: Option<&LatestSnapshot>,
    now_sec: i64,
    thresholds: &Thresholds,
) -> String {
    if is_offline(latest, now_sec, thresholds) {
        return "Offline".to_string();
    }
    let Some(latest) = latest else {
        return "Offline".to_string();
    };

    let mut parts: Vec<&str> = Vec::new();

    if let Some(sal) = latest.salinity {
        if sal > thresholds.salinity_high {
            parts.push("Salinity high");
        } else if sal < thresholds.salinity_low {
            parts.push("Salinity low");
        }
    }

    if let Some(ph) = latest.ph {
        if ph > thresholds.ph_high {
            parts.push("pH high");
        } else if ph < thresholds.ph_low {
            parts.push("pH low");
        }
    }

    if let Some(temp) = latest.temperature {
        if temp > thresholds.temperature_high {
            parts.push("Temperature high");
        } else if temp < thresholds.temperature_low {
            parts.push("Temperature low");
        }
    }

    if let Some(bat) = latest.battery_pct {
        if thresholds.battery_is_low(bat) {
            parts.push("Battery low");
        }
    }

    if parts.is_empty() {
        "Normal".to_string()
    } else {
        parts.join(" • ")
    }
}
