use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState, users::repo_types::User};

/// Extracts and validates the bearer JWT, yielding the caller's username.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthenticated("Invalid Authorization header".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                return Err(AppError::Unauthenticated("Invalid or expired token".into()));
            }
        };

        if state.config.auth.verify_user_exists
            && !User::exists(&state.db, &claims.username).await?
        {
            warn!(username = %claims.username, "token for unknown user");
            return Err(AppError::Unauthenticated("User no longer exists".into()));
        }

        Ok(AuthUser(claims.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, Request};

    async fn extract(header: Option<&str>) -> Result<AuthUser, AppError> {
        let state = AppState::fake();
        let mut builder = Request::builder().uri("/users");
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &state).await
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let token = JwtKeys::from_ref(&AppState::fake()).sign("alice").unwrap();
        let user = extract(Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.0, "alice");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn rejects_other_scheme() {
        let err = extract(Some("Basic YWxpY2U6cHc=")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn rejects_tampered_token() {
        let token = JwtKeys::from_ref(&AppState::fake()).sign("alice").unwrap();
        let err = extract(Some(&format!("Bearer {token}x"))).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
