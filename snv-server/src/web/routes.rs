//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::resolver::{GeoProvider, ResolveError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<P: GeoProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/snv", get(resolve_snv::<P>))
        .route("/snv/version", get(snv_version::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Resolve a coordinate to SNV segments, best match first.
async fn resolve_snv<P: GeoProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(req): Query<SnvRequest>,
) -> Result<Json<Vec<SnvResult>>, AppError> {
    let query = req
        .into_query()
        .map_err(|message| AppError::BadRequest { message })?;

    let segments = state.resolver.resolve(&query).await?;

    Ok(Json(segments.iter().map(SnvResult::from_segment).collect()))
}

/// Dataset version in force on a date (today by default).
async fn snv_version<P: GeoProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(req): Query<VersionRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    let date = state.resolver.reference_date(req.data.as_deref())?;
    let versao = state.resolver.version_for(date).await;

    Ok(Json(VersionResponse {
        data: date.to_string(),
        versao,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
