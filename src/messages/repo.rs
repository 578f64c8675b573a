use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::repo_types::{Message, MessageDetail, MessageDetailRow, NewMessage, ReadReceipt};
use crate::error::AppError;

impl Message {
    /// Insert a message. An unknown recipient violates the foreign key and
    /// comes back as `NotFound`.
    pub async fn create(db: &PgPool, new: NewMessage) -> Result<Message, AppError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (from_username, to_username, body, sent_at)
            VALUES ($1, $2, $3, current_timestamp)
            RETURNING id, from_username, to_username, body, sent_at, read_at
            "#,
        )
        .bind(&new.from_username)
        .bind(&new.to_username)
        .bind(&new.body)
        .fetch_one(db)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => {
                AppError::NotFound(format!("User '{}' not found", new.to_username))
            }
            other => other,
        })?;

        info!(
            id = %message.id,
            from = %message.from_username,
            to = %message.to_username,
            "message sent"
        );
        Ok(message)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<MessageDetail, AppError> {
        let row = sqlx::query_as::<_, MessageDetailRow>(
            r#"
            SELECT m.id, m.body, m.sent_at, m.read_at,
                   f.username AS from_username, f.first_name AS from_first_name,
                   f.last_name AS from_last_name, f.phone AS from_phone,
                   t.username AS to_username, t.first_name AS to_first_name,
                   t.last_name AS to_last_name, t.phone AS to_phone
            FROM messages AS m
            JOIN users AS f ON m.from_username = f.username
            JOIN users AS t ON m.to_username = t.username
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))?;
        Ok(row.into())
    }

    /// Set `read_at` the first time; later calls keep and return the original
    /// value.
    pub async fn mark_read(db: &PgPool, id: Uuid) -> Result<ReadReceipt, AppError> {
        sqlx::query_as::<_, ReadReceipt>(
            r#"
            UPDATE messages
            SET read_at = COALESCE(read_at, current_timestamp)
            WHERE id = $1
            RETURNING id, read_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))
    }
}
