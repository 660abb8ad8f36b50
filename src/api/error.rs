use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::lifecycle::{AlertStatus, TransitionError};
use crate::domain::submission::SubmitError;

/// Request-level error taxonomy. Every failure is per-operation and
/// recoverable by retrying the user action; nothing here is fatal to the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("no location fix available")]
    LocationUnavailable,
    #[error("{0}")]
    Auth(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("invalid transition from `{from}` to `{to}`")]
    InvalidTransition { from: AlertStatus, to: AlertStatus },
    #[error("{0}")]
    Internal(&'static str),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl ApiError {
    /// Stable machine-readable code, paired with the HTTP status so clients
    /// can branch without parsing messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::LocationUnavailable => "location_unavailable",
            Self::Auth(_) => "auth_error",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Internal(_) | Self::Db(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::LocationUnavailable => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::LocationUnavailable => Self::LocationUnavailable,
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidTransition { from, to } => {
                Self::InvalidTransition { from, to }
            }
            TransitionError::NotPermitted(msg) => Self::Forbidden(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }
        tracing::Span::current().record("error", tracing::field::display(&self));

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_errors_map_to_the_taxonomy() {
        let err: ApiError = SubmitError::LocationUnavailable.into();
        assert_eq!(err.code(), "location_unavailable");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err: ApiError = SubmitError::UnknownEmergencyType("tsunami".to_string()).into();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn transition_errors_split_guard_and_permission() {
        let err: ApiError = TransitionError::InvalidTransition {
            from: AlertStatus::Resolved,
            to: AlertStatus::Assigned,
        }
        .into();
        assert_eq!(err.code(), "invalid_transition");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = TransitionError::NotPermitted("nope").into();
        assert_eq!(err.code(), "forbidden");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
