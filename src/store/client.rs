use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::series::{Granularity, Window};
use crate::store::models::{DeviceListResponse, LatestSnapshot, SeriesPoint, SeriesResponse};

/// Document limit for a series query: the expected bucket count plus a
/// small margin for boundary buckets, capped at the store's hard maximum
/// so an over-wide window cannot pull the whole collection. Raw readings
/// have no bucket cadence to size against and always request the maximum.
#[must_use]
pub fn doc_limit(granularity: Granularity, lookback_sec: i64, max_docs: usize) -> usize {
    match granularity.bucket_sec() {
        Some(bucket) => usize::try_from(lookback_sec / bucket + 3)
            .unwrap_or(max_docs)
            .min(max_docs),
        None => max_docs,
    }
}

/// HTTP client for the managed document store holding device documents,
/// latest snapshots, and the pre-aggregated bucket collections.
pub struct StoreClient {
    http_client: Client,
    base_url: String,
    bearer_token: Option<String>,
    page_limit: usize,
    max_docs: usize,
}

impl StoreClient {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url: config.store_base_url.clone(),
            bearer_token: config.store_bearer_token.clone(),
            page_limit: config.store_page_limit,
            max_docs: config.store_max_docs,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http_client.get(url);
        if let Some(ref token) = self.bearer_token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// List known device ids, bounded to one page, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StoreApi` if the request fails or returns an
    /// error status.
    pub async fn list_device_ids(&self) -> AppResult<Vec<String>> {
        let url = format!("{}/devices?limit={}", self.base_url, self.page_limit);

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::StoreApi(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::StoreApi("Rate limited (429)".to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::StoreApi(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let list: DeviceListResponse = response
            .json()
            .await
            .map_err(|e| AppError::StoreApi(format!("Failed to parse response: {e}")))?;

        let mut ids: Vec<String> = list
            .devices
            .into_iter()
            .map(|d| d.id)
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Fetch the latest snapshot for a device; `None` if the document does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StoreApi` if the request fails or returns an
    /// error status other than 404.
    pub async fn get_latest(&self, device_id: &str) -> AppResult<Option<LatestSnapshot>> {
        let url = format!("{}/devices/{}/latest", self.base_url, device_id);

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::StoreApi(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::StoreApi("Rate limited (429)".to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::StoreApi(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| AppError::StoreApi(format!("Failed to parse response: {e}")))
    }

    /// Query a bucketed or raw series for a device, filtered by an
    /// inclusive range on the bucket start, ascending order. The document
    /// limit is sized by [`doc_limit`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::StoreApi` if the request fails or returns an
    /// error status.
    pub async fn query_series(
        &self,
        device_id: &str,
        granularity: Granularity,
        window: Window,
        lookback_sec: i64,
    ) -> AppResult<Vec<SeriesPoint>> {
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let want = doc_limit(granularity, lookback_sec, self.max_docs);

        let url = format!(
            "{}/devices/{}/{}?start_sec={}&end_sec={}&order=asc&limit={}",
            self.base_url,
            device_id,
            granularity.collection(),
            window.start_sec,
            window.end_sec,
            want
        );

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::StoreApi(format!("Request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::StoreApi("Rate limited (429)".to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::StoreApi(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::StoreApi(format!("Failed to get response text: {e}")))?;

        let series: SeriesResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse series response"
            );
            AppError::StoreApi(format!("Failed to parse response: {e}"))
        })?;

        Ok(series.points)
    }
}
