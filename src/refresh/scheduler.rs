use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::common::AppState;
use crate::refresh::cycle;

/// Run the snapshot refresh loop.
///
/// Cycles are strictly sequential: the ticker skips missed ticks instead of
/// bursting, so a slow cycle delays the next one rather than overlapping
/// it. Each cycle is stamped with a generation; a result older than the
/// published snapshot is discarded instead of overwriting newer state.
pub async fn run_refresh_loop(state: AppState) {
    let interval_secs = state.config.refresh_interval_seconds;

    tracing::info!(interval_secs, "Starting snapshot refresh loop");

    let mut ticker = interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // First tick fires immediately, giving an initial snapshot on boot
        ticker.tick().await;

        let generation = state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, "Running refresh cycle");

        let snapshot = cycle::run_cycle(&state, generation).await;

        let mut guard = state.snapshot.write().await;
        if snapshot.supersedes(guard.generation) {
            let device_count = snapshot.devices.len();
            *guard = snapshot;
            tracing::debug!(generation, device_count, "Refresh cycle published");
        } else {
            tracing::warn!(
                generation,
                published = guard.generation,
                "Discarding stale refresh cycle"
            );
        }
    }
}
