//! Session repository for database operations.
//!
//! Sessions back the `tamira_session` cookie. The client holds an opaque
//! random token; only its SHA-256 hash is stored, so a leaked database
//! cannot be replayed into live sessions.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};

use crate::entities::sessions;

/// Session repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates a random URL-safe session token.
    #[must_use]
    pub fn generate_token() -> String {
        let bytes: [u8; 32] = rand::random();
        base64_url::encode(&bytes)
    }

    /// Hashes a session token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Opens a new session for a user. Returns the raw token (sent to the
    /// client in the cookie) together with the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
        user_agent: Option<&str>,
    ) -> Result<(String, sessions::Model), DbErr> {
        let raw_token = Self::generate_token();
        let now = Utc::now();

        let session = sessions::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(Self::hash_token(&raw_token)),
            user_agent: Set(user_agent.map(String::from)),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let session = session.insert(&self.db).await?;

        Ok((raw_token, session))
    }

    /// Finds the live session for a raw token: not revoked, not expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_valid(&self, raw_token: &str) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::TokenHash.eq(Self::hash_token(raw_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Revokes a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, id: i64) -> Result<(), DbErr> {
        let now = Utc::now();

        sessions::ActiveModel {
            id: Set(id),
            revoked_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }

    /// Revokes the session a raw token points at, if one is live.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_by_token(&self, raw_token: &str) -> Result<bool, DbErr> {
        match self.find_valid(raw_token).await? {
            Some(session) => {
                self.revoke(session.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Deletes expired sessions (for maintenance).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn purge_expired(&self) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
