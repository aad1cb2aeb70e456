use moka::future::Cache;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::refresh::cycle::RenderSnapshot;
use crate::store::StoreClient;

/// Cached serialized API response.
#[derive(Clone)]
pub struct CachedResponse {
    pub data: Arc<Vec<u8>>,
}

/// Cache for API responses. Key is request params, value is the serialized
/// response. Weighted by byte size to enforce a memory limit; entries
/// expire on TTL since the backing snapshot refreshes on a fixed cadence.
pub type ResponseCache = Cache<String, CachedResponse>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<StoreClient>,
    pub response_cache: ResponseCache,
    /// Last published render snapshot; rebuilt wholesale each cycle so
    /// every reader within one render shares the same fetched state.
    pub snapshot: Arc<RwLock<RenderSnapshot>>,
    /// Monotonically increasing refresh-cycle counter. Results from a
    /// cycle older than the published snapshot are discarded.
    pub generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config, store: StoreClient) -> Self {
        // Cache weighted by byte size, not entry count
        let cache: ResponseCache = Cache::builder()
            .weigher(|_key: &String, value: &CachedResponse| -> u32 {
                value.data.len().try_into().unwrap_or(u32::MAX)
            })
            .max_capacity(config.cache_max_bytes)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            response_cache: cache,
            snapshot: Arc::new(RwLock::new(RenderSnapshot::empty())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}
