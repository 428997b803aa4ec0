//! HTTP error mapping and response envelopes.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::users::services::UserError;

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self) {
            Ok(bytes) => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response body");
                AppError::Internal("Internal server error".into()).into_response()
            }
        }
    }
}

/// Error envelope: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    Storage(String),
    /// Any other service failure (token signing, unreadable stored hash).
    #[error("{0}")]
    Service(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// Response encoding failed.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::NotFound(_)
            | AppError::Conflict(_)
            | AppError::InvalidCredentials(_)
            | AppError::Storage(_)
            | AppError::Service(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        let message = e.to_string();
        match e {
            UserError::NotFound(_) => AppError::NotFound(message),
            UserError::DuplicateEmail(_) => AppError::Conflict(message),
            UserError::InvalidCredentials => AppError::InvalidCredentials(message),
            UserError::PasswordTooLong => AppError::Validation(message),
            UserError::Storage { .. } => AppError::Storage(message),
            UserError::Password(_) | UserError::Token(_) => AppError::Service(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[test]
    fn domain_errors_map_to_bad_request() {
        let id = Uuid::new_v4();
        let cases = [
            AppError::from(UserError::NotFound(id)),
            AppError::from(UserError::InvalidCredentials),
            AppError::from(UserError::DuplicateEmail("a@b.co".into())),
            AppError::from(UserError::Storage {
                op: "list users",
                source: crate::users::repo::StoreError::Database(sqlx::Error::PoolTimedOut),
            }),
            AppError::Validation("bad".into()),
        ];
        for e in cases {
            assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unauthorized_is_401_with_generic_message() {
        let e = AppError::unauthorized();
        assert_eq!(e.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(e.to_string(), "Unauthorized");
    }

    #[test]
    fn error_envelope_serialization() {
        let json = serde_json::to_string(&ErrorResponse {
            message: "nope".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"message":"nope"}"#);
    }

    #[tokio::test]
    async fn success_envelope_is_json() {
        let res = ApiResponse::ok("done").into_response();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"data":"done"}"#);
    }

    #[tokio::test]
    async fn unencodable_data_is_500_with_message_envelope() {
        // JSON object keys must be strings
        let mut data = HashMap::new();
        data.insert((1, 2), "x");
        let res = ApiResponse::ok(data).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Internal server error" }));
    }
}
