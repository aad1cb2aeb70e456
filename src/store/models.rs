use serde::{Deserialize, Serialize};

/// Response from `GET /v1/devices`
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceListResponse {
    #[serde(default)]
    pub devices: Vec<DeviceDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceDoc {
    pub id: String,
}

/// Latest snapshot document for a device (`.../latest`).
///
/// Several generations of firmware wrote the battery voltage under
/// different names; every spelling seen in production is kept here and
/// resolved once by [`LatestSnapshot::resolve_battery_voltage`] so nothing
/// downstream has to know about the aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSnapshot {
    pub salinity: Option<f64>,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub battery_pct: Option<f64>,
    /// Explicit backend status, e.g. "OFFLINE"
    pub status: Option<String>,
    /// Epoch seconds of the last backend write
    pub updated_at: Option<i64>,
    /// Epoch seconds of the underlying measurement
    pub measured_at: Option<i64>,
    #[serde(default)]
    pub alerts: Vec<String>,

    // Legacy battery-voltage spellings, in resolution order
    pub battery_volt: Option<f64>,
    pub battery_volt_avg: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub avg_battery_volt: Option<f64>,
    pub avg_battery_voltage: Option<f64>,
    pub avg_voltage: Option<f64>,
    pub voltage: Option<f64>,
}

impl LatestSnapshot {
    /// First battery-voltage candidate that is present and non-zero. A
    /// literal 0.0 means the firmware wrote a placeholder, not a reading.
    #[must_use]
    pub fn resolve_battery_voltage(&self) -> Option<f64> {
        [
            self.battery_volt,
            self.battery_volt_avg,
            self.battery_voltage,
            self.avg_battery_volt,
            self.avg_battery_voltage,
            self.avg_voltage,
            self.voltage,
        ]
        .into_iter()
        .flatten()
        .find(|v| *v != 0.0)
    }

    /// Timestamp to judge freshness by; `updatedAt` wins over `measuredAt`.
    #[must_use]
    pub fn last_update_sec(&self) -> Option<i64> {
        self.updated_at.or(self.measured_at)
    }
}

/// Response from `GET /v1/devices/{id}/{collection}`
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub points: Vec<SeriesPoint>,
}

/// One pre-aggregated bucket (or one raw reading).
///
/// Raw readings carry the un-prefixed field names; the serde aliases fold
/// both shapes into one struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Bucket start (or measurement time for raw readings), epoch seconds,
    /// strictly increasing within one response
    pub bucket_start_sec: i64,
    #[serde(alias = "salinity")]
    pub avg_salinity: Option<f64>,
    #[serde(alias = "temperature")]
    pub avg_temperature: Option<f64>,
    #[serde(alias = "ph")]
    pub avg_ph: Option<f64>,
    #[serde(alias = "batteryPct")]
    pub avg_battery_pct: Option<f64>,
}
