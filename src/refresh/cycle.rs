use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::common::AppState;
use crate::refresh::alerts::AlertSummary;
use crate::refresh::meta::{device_meta, DeviceMeta};
use crate::status::{classify, DeviceStatus};
use crate::store::models::LatestSnapshot;

/// One device within a render snapshot.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    pub meta: DeviceMeta,
    pub latest: Option<LatestSnapshot>,
    pub status: DeviceStatus,
}

/// Everything one render cycle fetched and derived, published atomically.
/// Readers within a cycle share this state instead of re-fetching per
/// widget.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub generation: u64,
    pub refreshed_at: DateTime<Utc>,
    pub devices: Vec<DeviceEntry>,
    pub alerts: AlertSummary,
}

impl RenderSnapshot {
    /// Placeholder published before the first cycle completes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            generation: 0,
            refreshed_at: DateTime::<Utc>::MIN_UTC,
            devices: Vec::new(),
            alerts: AlertSummary::default(),
        }
    }

    #[must_use]
    pub fn device(&self, id: &str) -> Option<&DeviceEntry> {
        self.devices.iter().find(|d| d.meta.id == id)
    }

    /// Whether this cycle result may replace the published snapshot. Only
    /// a strictly newer generation publishes; a cycle overtaken while its
    /// fetches were in flight is discarded.
    #[must_use]
    pub fn supersedes(&self, published_generation: u64) -> bool {
        self.generation > published_generation
    }
}

/// Run one refresh cycle: list devices, fan out latest-snapshot fetches,
/// classify, and aggregate alerts.
///
/// A failed device listing falls back to the configured static ids; a
/// failed per-device fetch degrades to "no snapshot" for that device. The
/// cycle itself therefore never fails outright.
pub async fn run_cycle(state: &AppState, generation: u64) -> RenderSnapshot {
    let ids = match state.store.list_device_ids().await {
        Ok(ids) if !ids.is_empty() => ids,
        Ok(_) => {
            tracing::warn!("Device listing returned no devices, using fallback list");
            state.config.fallback_device_ids.clone()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Device listing failed, using fallback list");
            state.config.fallback_device_ids.clone()
        }
    };

    // Fan out latest fetches; each failure degrades to None independently
    let fetches = ids.iter().map(|id| {
        let store = state.store.clone();
        async move {
            match store.get_latest(id).await {
                Ok(latest) => latest,
                Err(e) => {
                    tracing::warn!(device = %id, error = %e, "Latest snapshot fetch failed");
                    None
                }
            }
        }
    });
    let snapshots: Vec<Option<LatestSnapshot>> = join_all(fetches).await;

    let now_sec = Utc::now().timestamp();
    let thresholds = &state.config.thresholds;

    let devices: Vec<DeviceEntry> = ids
        .into_iter()
        .zip(snapshots)
        .map(|(id, latest)| {
            let status = classify(latest.as_ref(), now_sec, thresholds);
            DeviceEntry {
                meta: device_meta(&id),
                latest,
                status,
            }
        })
        .collect();

    let alerts = AlertSummary::build(&devices, now_sec, thresholds);

    RenderSnapshot {
        generation,
        refreshed_at: Utc::now(),
        devices,
        alerts,
    }
}
