use sqlx::PgPool;
use tracing::{debug, instrument};

use super::repo_types::{
    MessageWithPartyRow, NewUser, PublicUser, ReceivedMessage, SentMessage, User, UserProfile,
};
use crate::{auth::password::Hasher, error::AppError};

impl User {
    /// Hash the password and insert the user. `join_at` and `last_login_at`
    /// both start at the insert time.
    #[instrument(skip(db, hasher, new), fields(username = %new.username))]
    pub async fn register(db: &PgPool, hasher: &Hasher, new: NewUser) -> Result<User, AppError> {
        let NewUser {
            username,
            password,
            first_name,
            last_name,
            phone,
        } = new;
        let hashed = hasher.hash(password).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, first_name, last_name, phone, join_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, current_timestamp, current_timestamp)
            RETURNING username, password, first_name, last_name, phone, join_at, last_login_at
            "#,
        )
        .bind(&username)
        .bind(&hashed)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&phone)
        .fetch_one(db)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Username '{username}' already taken"))
            }
            other => other,
        })?;
        Ok(user)
    }

    /// Check a candidate password against the stored hash. Unknown usernames
    /// are an error, a wrong password is `Ok(false)`.
    #[instrument(skip(db, hasher, password))]
    pub async fn authenticate(
        db: &PgPool,
        hasher: &Hasher,
        username: &str,
        password: &str,
    ) -> Result<bool, AppError> {
        let stored = sqlx::query_scalar::<_, String>(
            r#"
            SELECT password
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;

        let Some(hash) = stored else {
            debug!("unknown username");
            return Err(AppError::InvalidCredentials);
        };
        Ok(hasher.verify(password.to_string(), hash).await?)
    }

    /// Bump `last_login_at`. The new value is always later than the old one,
    /// even when two logins land inside the same clock tick.
    #[instrument(skip(db))]
    pub async fn update_login_timestamp(db: &PgPool, username: &str) -> Result<(), AppError> {
        let updated = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE users
            SET last_login_at = GREATEST(clock_timestamp(), last_login_at + interval '1 microsecond')
            WHERE username = $1
            RETURNING username
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;

        match updated {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("User not found".into())),
        }
    }

    pub async fn all(db: &PgPool) -> Result<Vec<PublicUser>, AppError> {
        let users = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT username, first_name, last_name, phone
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    pub async fn get(db: &PgPool, username: &str) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT username, first_name, last_name, phone, join_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn exists(db: &PgPool, username: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)"#,
        )
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(found)
    }

    /// Outbox. An unknown user simply has no messages.
    pub async fn messages_from(
        db: &PgPool,
        username: &str,
    ) -> Result<Vec<SentMessage>, AppError> {
        let rows = sqlx::query_as::<_, MessageWithPartyRow>(
            r#"
            SELECT m.id, m.body, m.sent_at, m.read_at,
                   u.username, u.first_name, u.last_name, u.phone
            FROM messages AS m
            JOIN users AS u ON m.to_username = u.username
            WHERE m.from_username = $1
            ORDER BY m.sent_at, m.id
            "#,
        )
        .bind(username)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(SentMessage::from).collect())
    }

    /// Inbox. An unknown user simply has no messages.
    pub async fn messages_to(
        db: &PgPool,
        username: &str,
    ) -> Result<Vec<ReceivedMessage>, AppError> {
        let rows = sqlx::query_as::<_, MessageWithPartyRow>(
            r#"
            SELECT m.id, m.body, m.sent_at, m.read_at,
                   u.username, u.first_name, u.last_name, u.phone
            FROM messages AS m
            JOIN users AS u ON m.from_username = u.username
            WHERE m.to_username = $1
            ORDER BY m.sent_at, m.id
            "#,
        )
        .bind(username)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(ReceivedMessage::from).collect())
    }
}
