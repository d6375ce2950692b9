//! Health check endpoint

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{services::cache::CacheStats, AppState};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Whether a Google Books credential is configured
    pub google_books_available: bool,
    pub cache_stats: CacheStats,
    pub library_count: usize,
    pub borrowed_count: usize,
}

/// Liveness check with in-memory statistics
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (library_count, borrowed_count) = state.services.library.counts().await;

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        google_books_available: state.services.books.primary_available(),
        cache_stats: state.services.books.cache_stats().await,
        library_count,
        borrowed_count,
    })
}
