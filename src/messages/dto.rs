use serde::{Deserialize, Serialize};

use super::repo_types::NewMessage;
use crate::error::AppError;

/// Request body for sending a message. The sender is the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateMessageRequest {
    pub to_user: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: T,
}

impl CreateMessageRequest {
    pub fn into_new_message(self, from_username: String) -> Result<NewMessage, AppError> {
        let to_username = self
            .to_user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let body = self.body.filter(|b| !b.trim().is_empty());

        match (to_username, body) {
            (Some(to_username), Some(body)) => Ok(NewMessage {
                from_username,
                to_username,
                body,
            }),
            _ => Err(AppError::Validation(
                "Unable to complete request: to_user and body are required".into(),
            )),
        }
    }
}
