use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateMessageRequest, MessageResponse},
    repo_types::{Message, MessageDetail, ReadReceipt},
};
use crate::{
    auth::{
        extractors::AuthUser,
        policy::{authorize, Capability},
    },
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(create_message))
        .route("/messages/:id", get(get_message))
        .route("/messages/:id/read", post(mark_read))
}

#[instrument(skip(state))]
pub async fn get_message(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<MessageResponse<MessageDetail>>> {
    let message = Message::get(&state.db, id).await?;
    authorize(&caller, Capability::Participant, &message)?;
    Ok(Json(MessageResponse { message }))
}

#[instrument(skip(state, payload))]
pub async fn create_message(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    JsonBody(payload): JsonBody<CreateMessageRequest>,
) -> AppResult<Json<MessageResponse<Message>>> {
    let new = payload.into_new_message(caller)?;
    let message = Message::create(&state.db, new).await?;
    Ok(Json(MessageResponse { message }))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<MessageResponse<ReadReceipt>>> {
    let message = Message::get(&state.db, id).await?;
    authorize(&caller, Capability::Recipient, &message)?;

    let receipt = Message::mark_read(&state.db, id).await?;
    info!(%id, reader = %caller, "message marked read");
    Ok(Json(MessageResponse { message: receipt }))
}
