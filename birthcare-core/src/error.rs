use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Machine-readable reason code attached to subscription-gate denials.
pub const SUBSCRIPTION_REQUIRED_CODE: &str = "subscription_required";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    PayloadValidation(#[from] validator::ValidationErrors),

    #[error("Validation error: {0}")]
    Validation(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Subscription required")]
    SubscriptionRequired {
        /// Where the caller should be sent to fix their subscription state.
        redirect: &'static str,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            code: Option<&'static str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            redirect: Option<&'static str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, code, redirect, details) = match self {
            AppError::PayloadValidation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error".to_string(),
                None,
                None,
                Some(err.to_string()),
            ),
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                err.to_string(),
                None,
                None,
                None,
            ),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None, None, None),
            AppError::Unauthenticated(err) => {
                (StatusCode::UNAUTHORIZED, err.to_string(), None, None, None)
            }
            AppError::Forbidden(err) => (StatusCode::FORBIDDEN, err.to_string(), None, None, None),
            AppError::Conflict(err) => (StatusCode::CONFLICT, err.to_string(), None, None, None),
            AppError::SubscriptionRequired { redirect } => (
                StatusCode::FORBIDDEN,
                "An active subscription is required to use this feature".to_string(),
                Some(SUBSCRIPTION_REQUIRED_CODE),
                Some(redirect),
                None,
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
                None,
                Some(format!("{:#}", err)),
            ),
            AppError::DatabaseError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                None,
                None,
                Some(err.to_string()),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                None,
                None,
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                code,
                redirect,
                details,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let resp = AppError::Validation(anyhow::anyhow!("amount must be positive")).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflict_maps_to_409() {
        let resp = AppError::Conflict(anyhow::anyhow!("wrong state")).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn subscription_required_maps_to_403() {
        let resp = AppError::SubscriptionRequired {
            redirect: "/subscription/plans",
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let resp = AppError::Unauthenticated(anyhow::anyhow!("missing token")).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
