use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{auth::policy::Parties, users::repo_types::PublicUser};

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub from_username: String,
    pub to_username: String,
    pub body: String,
}

/// Message record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
}

#[derive(Debug, FromRow)]
pub struct MessageDetailRow {
    pub id: Uuid,
    pub body: String,
    pub sent_at: OffsetDateTime,
    pub read_at: Option<OffsetDateTime>,
    pub from_username: String,
    pub from_first_name: String,
    pub from_last_name: String,
    pub from_phone: String,
    pub to_username: String,
    pub to_first_name: String,
    pub to_last_name: String,
    pub to_phone: String,
}

/// A message with both parties' public profiles.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDetail {
    pub id: Uuid,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    pub from_user: PublicUser,
    pub to_user: PublicUser,
}

impl From<MessageDetailRow> for MessageDetail {
    fn from(r: MessageDetailRow) -> Self {
        Self {
            id: r.id,
            body: r.body,
            sent_at: r.sent_at,
            read_at: r.read_at,
            from_user: PublicUser {
                username: r.from_username,
                first_name: r.from_first_name,
                last_name: r.from_last_name,
                phone: r.from_phone,
            },
            to_user: PublicUser {
                username: r.to_username,
                first_name: r.to_first_name,
                last_name: r.to_last_name,
                phone: r.to_phone,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReadReceipt {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub read_at: OffsetDateTime,
}

impl Parties for MessageDetail {
    fn sender(&self) -> &str {
        &self.from_user.username
    }
    fn recipient(&self) -> &str {
        &self.to_user.username
    }
}
