pub mod cache;
pub mod dashboard;
pub mod devices;
pub mod health;
mod rate_limit;
pub mod series;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        devices::list_devices,
        devices::get_device,
        devices::get_device_kpis,
        dashboard::get_alerts,
        series::get_device_series,
    ),
    components(
        schemas(
            devices::DeviceRow,
            devices::DevicesResponse,
            devices::KpiResponse,
            dashboard::AlertsResponse,
            series::SeriesResponse,
            series::PlotPoint,
            crate::refresh::alerts::AlertLine,
            crate::refresh::alerts::AlertDevice,
            crate::series::Granularity,
            crate::series::Window,
            crate::status::DeviceStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "devices", description = "Device overview and KPI cards"),
        (name = "dashboard", description = "Dashboard-wide alert summaries"),
        (name = "series", description = "Downsampled time series and CSV export"),
    ),
    info(
        title = "Saltwatch API",
        description = "Water-quality monitoring API for estuary sensor fleets",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            metadata_rate = %format!("{}/s burst {}", config.rate_limit_metadata_per_second, config.rate_limit_metadata_burst),
            data_rate = %format!("{}/s burst {}", config.rate_limit_data_per_second, config.rate_limit_data_burst),
            bulk_concurrent = config.bulk_concurrent_limit,
            "Rate limiting configured"
        );
    }

    // Snapshot-backed routes: cheap reads, tighter steady rate
    let metadata_routes_base = Router::new()
        .route("/devices", get(devices::list_devices))
        .route("/devices/{device_id}", get(devices::get_device))
        .route("/devices/{device_id}/kpis", get(devices::get_device_kpis))
        .route("/dashboard/alerts", get(dashboard::get_alerts));

    // Store-backed routes: each request may fan out to the document store
    let data_routes_base = Router::new().route(
        "/devices/{device_id}/series",
        get(series::get_device_series),
    );

    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(metadata_routes_base)
            .merge(data_routes_base)
    } else {
        let metadata_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_metadata_per_second)
            .burst_size(config.rate_limit_metadata_burst)
            .finish()
            .expect("Failed to create metadata rate limiter");

        let data_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_data_per_second)
            .burst_size(config.rate_limit_data_burst)
            .finish()
            .expect("Failed to create data rate limiter");

        Router::new()
            .merge(metadata_routes_base.layer(GovernorLayer {
                config: Arc::new(metadata_limiter),
            }))
            .merge(data_routes_base.layer(GovernorLayer {
                config: Arc::new(data_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
