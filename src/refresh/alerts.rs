use serde::Serialize;
use utoipa::ToSchema;

use crate::refresh::cycle::DeviceEntry;
use crate::status::{is_offline, Thresholds};

/// A device reference inside an alert line.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertDevice {
    pub id: String,
    pub name: String,
}

/// The four dashboard alert lines, each grouping every device currently in
/// that condition. Offline devices appear only on the offline line.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AlertSummary {
    pub salinity_high: Vec<AlertDevice>,
    pub salinity_low: Vec<AlertDevice>,
    pub ph_high: Vec<AlertDevice>,
    pub ph_low: Vec<AlertDevice>,
    pub battery_low: Vec<AlertDevice>,
    pub offline: Vec<AlertDevice>,
}

/// One rendered alert line; lines with no affected devices are omitted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertLine {
    pub label: &'static str,
    pub message: String,
    pub devices: Vec<AlertDevice>,
}

fn names(devices: &[AlertDevice]) -> String {
    devices
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn two_side_message(
    high: &[AlertDevice],
    low: &[AlertDevice],
    high_text: &str,
    low_text: &str,
) -> String {
    let mut parts = Vec::new();
    if !high.is_empty() {
        parts.push(format!("{} {high_text}", names(high)));
    }
    if !low.is_empty() {
        parts.push(format!("{} {low_text}", names(low)));
    }
    parts.join("; ")
}

impl AlertSummary {
    /// Build the summary from classified device entries. Devices with no
    /// snapshot are skipped entirely, matching the dashboard behavior of
    /// hiding unknown stations from the alert bar.
    #[must_use]
    pub fn build(entries: &[DeviceEntry], now_sec: i64, thresholds: &Thresholds) -> Self {
        let mut summary = Self::default();

        for entry in entries {
            let Some(latest) = entry.latest.as_ref() else {
                continue;
            };
            let device = AlertDevice {
                id: entry.meta.id.clone(),
                name: entry.meta.name.clone(),
            };

            if is_offline(Some(latest), now_sec, thresholds) {
                summary.offline.push(device);
                continue;
            }

            if let Some(sal) = latest.salinity {
                if sal > thresholds.salinity_high {
                    summary.salinity_high.push(device.clone());
                } else if sal < thresholds.salinity_low {
                    summary.salinity_low.push(device.clone());
                }
            }

            if let Some(ph) = latest.ph {
                if ph > thresholds.ph_high {
                    summary.ph_high.push(device.clone());
                } else if ph < thresholds.ph_low {
                    summary.ph_low.push(device.clone());
                }
            }

            if let Some(bat) = latest.battery_pct {
                if thresholds.battery_is_low(bat) {
                    summary.battery_low.push(device);
                }
            }
        }

        summary
    }

    /// Render the non-empty alert lines in display order.
    #[must_use]
    pub fn lines(&self, thresholds: &Thresholds) -> Vec<AlertLine> {
        let mut lines = Vec::new();

        let salinity = two_side_message(
            &self.salinity_high,
            &self.salinity_low,
            "salinity above range",
            "salinity below range",
        );
        if !salinity.is_empty() {
            let mut devices = self.salinity_high.clone();
            devices.extend(self.salinity_low.iter().cloned());
            lines.push(AlertLine {
                label: "Salinity",
                message: format!("{salinity}."),
                devices,
            });
        }

        let ph = two_side_message(&self.ph_high, &self.ph_low, "pH above range", "pH below range");
        if !ph.is_empty() {
            let mut devices = self.ph_high.clone();
            devices.extend(self.ph_low.iter().cloned());
            lines.push(AlertLine {
                label: "pH",
                message: format!("{ph}."),
                devices,
            });
        }

        if !self.battery_low.is_empty() {
            let comparator = if thresholds.battery_low_inclusive {
                "at or below"
            } else {
                "below"
            };
            lines.push(AlertLine {
                label: "Battery",
                message: format!(
                    "{} battery {comparator} {}%.",
                    names(&self.battery_low),
                    thresholds.battery_low_pct
                ),
                devices: self.battery_low.clone(),
            });
        }

        if !self.offline.is_empty() {
            lines.push(AlertLine {
                label: "Offline",
                message: format!("{} disconnected.", names(&self.offline)),
                devices: self.offline.clone(),
            });
        }

        lines
    }
}
