//! Unified error handling for the portal.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use schoolcom_core::StorageError;
use serde::Serialize;
use thiserror::Error;

use crate::ai::GenerationError;
use crate::auth::{AuthError, Session};
use crate::records::{RecordError, ValidationErrors};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted data failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The AI helper could not produce a draft.
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The operation is not allowed in the record's current state.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A page template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Validation(errors) => Self::Validation(errors),
            RecordError::NotFound(id) => Self::NotFound(id.to_string()),
            RecordError::Precondition(reason) => Self::Precondition(reason.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Generation(GenerationError::MissingInput(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Auth(AuthError::Storage(_))
            | Self::Storage(_)
            | Self::Template(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
            Self::Precondition(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() && !matches!(self, Self::Generation(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Portal request error"
            );
        } else if matches!(self, Self::Generation(_)) {
            tracing::warn!(error = %self, "AI helper failed");
        }

        // Don't expose internal error details to clients
        let error = match &self {
            Self::Storage(_) | Self::Template(_) | Self::Internal(_) | Self::Auth(AuthError::Storage(_)) => {
                "Internal server error".to_string()
            }
            Self::Generation(GenerationError::MissingInput(field)) => {
                format!("missing input: {field}")
            }
            Self::Generation(_) => "generation failed".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Set the Sentry user context from the signed-in session.
pub fn set_sentry_user(session: &Session) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(session.email.to_string()),
            username: Some(session.display_name.clone()),
            ..Default::default()
        }));
        scope.set_tag("role", session.role.as_str());
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use schoolcom_core::RecordId;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("42".to_string());
        assert_eq!(err.to_string(), "Not found: 42");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::Validation(ValidationErrors::required("name"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Generation(GenerationError::Disabled)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Generation(GenerationError::MissingInput("eventTitle"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Precondition("sent".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_record_errors_map_to_app_errors() {
        let err = AppError::from(RecordError::NotFound(RecordId::from("7")));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = AppError::from(RecordError::Precondition("courses.errors.hasStudents"));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
