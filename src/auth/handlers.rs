use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        jwt::JwtKeys,
    },
    error::{AppError, AppResult},
    extract::JsonBody,
    state::AppState,
    users::repo_types::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let new = payload.validate().map_err(|e| {
        warn!(error = %e, "rejected registration");
        e
    })?;

    let user = User::register(&state.db, &state.hasher, new).await?;

    let token = JwtKeys::from_ref(&state).sign(&user.username)?;
    info!(username = %user.username, "user registered");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let username = payload.username.trim();

    let ok = User::authenticate(&state.db, &state.hasher, username, &payload.password).await?;
    if !ok {
        warn!("login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    User::update_login_timestamp(&state.db, username).await?;

    let token = JwtKeys::from_ref(&state).sign(username)?;
    info!("user logged in");
    Ok(Json(TokenResponse { token }))
}
