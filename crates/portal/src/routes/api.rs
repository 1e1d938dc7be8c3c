//! JSON endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use tracing::instrument;

use crate::ai::{NotificationTextInput, NotificationTextOutput, generate_notification_text};
use crate::error::AppError;
use crate::middleware::{Composers, RequireRole};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339.
    pub timestamp: String,
}

/// Liveness check for load balancers.
pub async fn health() -> &'static str {
    "ok"
}

/// Health status with the server time.
pub async fn api_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Draft notification text for an event.
#[instrument(skip_all, fields(role = %session.role))]
pub async fn generate_notification(
    RequireRole { session, .. }: RequireRole<Composers>,
    State(state): State<AppState>,
    Json(input): Json<NotificationTextInput>,
) -> Result<Json<NotificationTextOutput>, AppError> {
    let output = generate_notification_text(state.claude(), &input).await?;
    Ok(Json(output))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(api_health))
        .route("/api/notifications/generate", post(generate_notification))
}
