use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Validated registration input. `password` is still plaintext here.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .finish()
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String, // Argon2 PHC string, not exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub join_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PublicUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub join_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login_at: OffsetDateTime,
}

/// A message joined with the profile of the other party.
#[derive(Debug, FromRow)]
pub struct MessageWithPartyRow {
    pub id: Uuid,
    pub body: String,
    pub sent_at: OffsetDateTime,
    pub read_at: Option<OffsetDateTime>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl MessageWithPartyRow {
    fn split(self) -> (Uuid, String, OffsetDateTime, Option<OffsetDateTime>, PublicUser) {
        let party = PublicUser {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
        };
        (self.id, self.body, self.sent_at, self.read_at, party)
    }
}

/// Outbox entry.
#[derive(Debug, Clone, Serialize)]
pub struct SentMessage {
    pub id: Uuid,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    pub to_user: PublicUser,
}

/// Inbox entry.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedMessage {
    pub id: Uuid,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub read_at: Option<OffsetDateTime>,
    pub from_user: PublicUser,
}

impl From<MessageWithPartyRow> for SentMessage {
    fn from(r: MessageWithPartyRow) -> Self {
        let (id, body, sent_at, read_at, to_user) = r.split();
        Self {
            id,
            body,
            sent_at,
            read_at,
            to_user,
        }
    }
}

impl From<MessageWithPartyRow> for ReceivedMessage {
    fn from(r: MessageWithPartyRow) -> Self {
        let (id, body, sent_at, read_at, from_user) = r.split();
        Self {
            id,
            body,
            sent_at,
            read_at,
            from_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn row() -> MessageWithPartyRow {
        MessageWithPartyRow {
            id: Uuid::new_v4(),
            body: "hi".into(),
            sent_at: datetime!(2024-05-01 12:00 UTC),
            read_at: None,
            username: "bob".into(),
            first_name: "Bob".into(),
            last_name: "Builder".into(),
            phone: "555".into(),
        }
    }

    #[test]
    fn user_never_serializes_password() {
        let user = User {
            username: "alice".into(),
            password: "$argon2id$v=19$secret".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            phone: "555".into(),
            join_at: datetime!(2024-05-01 12:00 UTC),
            last_login_at: datetime!(2024-05-01 12:00 UTC),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn new_user_debug_redacts_password() {
        let u = NewUser {
            username: "alice".into(),
            password: "plaintext".into(),
            first_name: "A".into(),
            last_name: "L".into(),
            phone: "1".into(),
        };
        assert!(!format!("{u:?}").contains("plaintext"));
    }

    #[test]
    fn sent_message_nests_recipient() {
        let m = SentMessage::from(row());
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["to_user"]["username"], "bob");
        assert_eq!(v["body"], "hi");
        assert!(v["read_at"].is_null());
        assert!(v.get("from_user").is_none());
    }

    #[test]
    fn received_message_nests_sender() {
        let mut r = row();
        r.read_at = Some(datetime!(2024-05-02 08:30 UTC));
        let v = serde_json::to_value(ReceivedMessage::from(r)).unwrap();
        assert_eq!(v["from_user"]["first_name"], "Bob");
        assert_eq!(v["read_at"], "2024-05-02T08:30:00Z");
    }
}
