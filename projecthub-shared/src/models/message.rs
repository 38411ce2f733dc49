/// Message model
///
/// Messages belong to one conversation and carry a single shared read flag
/// (see the conversation module for the read-state semantics).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE messages (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     conversation_id UUID NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
///     sender_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     is_read BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A single message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,

    /// Conversation this message belongs to
    pub conversation_id: Uuid,

    /// Sending account
    pub sender_id: Uuid,

    /// Message text
    pub content: String,

    /// Shared read flag (set for all recipients at once)
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message and bumps the conversation's activity timestamp
    pub async fn create(
        pool: &PgPool,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, conversation_id, sender_id, content, is_read, created_at
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message)
    }

    /// Finds a message by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, is_read, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }

    /// Lists a conversation's messages, oldest first
    ///
    /// Ties on creation time are broken by message id, consistently with the
    /// last-message query.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Marks a single message as read
    ///
    /// Returns true if the message was found.
    pub async fn mark_as_read(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
