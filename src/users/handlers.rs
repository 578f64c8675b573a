use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{MessagesResponse, UserResponse, UsersResponse},
    repo_types::{ReceivedMessage, SentMessage, User},
};
use crate::{
    auth::extractors::AuthUser, error::AppResult, extract::PathParam, state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:username", get(get_user))
        .route("/users/:username/to", get(messages_to))
        .route("/users/:username/from", get(messages_from))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> AppResult<Json<UsersResponse>> {
    let users = User::all(&state.db).await?;
    Ok(Json(UsersResponse { users }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<UserResponse>> {
    let user = User::get(&state.db, &username).await?;
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(state))]
pub async fn messages_to(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<MessagesResponse<ReceivedMessage>>> {
    let messages = User::messages_to(&state.db, &username).await?;
    Ok(Json(MessagesResponse { messages }))
}

#[instrument(skip(state))]
pub async fn messages_from(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<MessagesResponse<SentMessage>>> {
    let messages = User::messages_from(&state.db, &username).await?;
    Ok(Json(MessagesResponse { messages }))
}
