use axum::http::StatusCode;

/// Liveness probe
///
/// Returns 200 OK while the process is up, even before the first refresh
/// cycle has published a snapshot (the data endpoints return 503 until
/// then). Mounted outside the rate limiters so monitors can poll freely.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
