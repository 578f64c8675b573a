use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid username or password.")]
    InvalidCredentials,
    /// Missing, malformed or expired token.
    #[error("{0}")]
    Unauthenticated(String),
    /// Authenticated, but not allowed to act on the resource.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict("Already exists".into());
            }
            if db.is_foreign_key_violation() {
                return AppError::NotFound("Referenced user not found".into());
            }
        }
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Not found".into()),
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to the client.
    pub fn user_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else if matches!(
            self,
            AppError::Unauthenticated(_) | AppError::Unauthorized | AppError::InvalidCredentials
        ) {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "client error");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = json!({
            "error": {
                "message": self.user_message(),
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn server_errors_hide_details() {
        let err = AppError::Internal(anyhow::anyhow!("secret connection string"));
        assert_eq!(err.user_message(), "Internal server error");

        let err = AppError::Validation("body is required".into());
        assert_eq!(err.user_message(), "body is required");
    }

    #[tokio::test]
    async fn response_body_has_message_and_status() {
        let res = AppError::Conflict("Username already taken".into()).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["error"]["message"], "Username already taken");
        assert_eq!(v["error"]["status"], 409);
    }
}
