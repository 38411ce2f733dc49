/// Conversation model and read-state tracking
///
/// A conversation is a set of participant accounts holding an ordered
/// sequence of messages, either one-on-one or group. Unread tracking uses a
/// single shared `is_read` flag per message, not per-recipient state: when
/// any participant retrieves a conversation, every message in it not
/// authored by them is marked read in bulk, for everyone. This mirrors the
/// platform's long-standing behavior and is kept for compatibility.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE conversations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL DEFAULT '',
///     is_group BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE conversation_participants (
///     conversation_id UUID NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     PRIMARY KEY (conversation_id, account_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use projecthub_shared::models::conversation::Conversation;
/// use projecthub_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// # let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
///
/// // Second call returns the same conversation instead of creating another
/// let (conversation, created) = Conversation::find_or_create_direct(&pool, alice, bob).await?;
/// let unread = Conversation::unread_count(&pool, conversation.id, bob).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::message::Message;

/// Conversation model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: Uuid,

    /// Display name; empty for one-on-one conversations
    pub name: String,

    /// Whether this is a group conversation
    pub is_group: bool,

    pub created_at: DateTime<Utc>,

    /// Bumped whenever a message is sent, so listings sort by activity
    pub updated_at: DateTime<Utc>,
}

const CONVERSATION_COLUMNS: &str = "id, name, is_group, created_at, updated_at";

impl Conversation {
    /// Creates a conversation with the given participants
    ///
    /// The creator is always included in the participant set, whether or not
    /// they appear in `participant_ids`.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        is_group: bool,
        creator_id: Uuid,
        participant_ids: &[Uuid],
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            r#"
            INSERT INTO conversations (name, is_group)
            VALUES ($1, $2)
            RETURNING {CONVERSATION_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(is_group)
        .fetch_one(&mut *tx)
        .await?;

        for account_id in participant_ids.iter().chain(std::iter::once(&creator_id)) {
            sqlx::query(
                r#"
                INSERT INTO conversation_participants (conversation_id, account_id)
                VALUES ($1, $2)
                ON CONFLICT (conversation_id, account_id) DO NOTHING
                "#,
            )
            .bind(conversation.id)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(conversation)
    }

    /// Finds a conversation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(conversation)
    }

    /// Lists conversations an account participates in, most recently active
    /// first
    pub async fn list_for_account(
        pool: &PgPool,
        account_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.id, c.name, c.is_group, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE cp.account_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(pool)
        .await?;

        Ok(conversations)
    }

    /// Lists participant account IDs
    pub async fn participants(pool: &PgPool, id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT account_id FROM conversation_participants
            WHERE conversation_id = $1
            ORDER BY account_id
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Checks whether an account participates in a conversation
    pub async fn is_participant(
        pool: &PgPool,
        id: Uuid,
        account_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM conversation_participants
                WHERE conversation_id = $1 AND account_id = $2
            )
            "#,
        )
        .bind(id)
        .bind(account_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Most recent message by creation time
    ///
    /// Ties are broken by message id so repeated reads return the same row.
    pub async fn last_message(pool: &PgPool, id: Uuid) -> Result<Option<Message>, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender_id, content, is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }

    /// Counts messages not sent by `account_id` and not yet marked read
    pub async fn unread_count(
        pool: &PgPool,
        id: Uuid,
        account_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE
            "#,
        )
        .bind(id)
        .bind(account_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Marks every message not authored by `reader_id` as read, in bulk
    ///
    /// Runs when a participant retrieves the conversation. The flag is
    /// shared per message: in a group conversation this clears the unread
    /// count for every participant, not only the reader. Idempotent under
    /// retries.
    ///
    /// Returns the number of messages that changed state.
    pub async fn mark_read(
        pool: &PgPool,
        id: Uuid,
        reader_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE
            "#,
        )
        .bind(id)
        .bind(reader_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Finds the one-on-one conversation between two accounts, creating it
    /// if none exists
    ///
    /// Returns the conversation and whether it was created by this call.
    /// Calling this twice with the same pair yields the same conversation.
    pub async fn find_or_create_direct(
        pool: &PgPool,
        account_a: Uuid,
        account_b: Uuid,
    ) -> Result<(Self, bool), sqlx::Error> {
        let existing = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.id, c.name, c.is_group, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants pa ON pa.conversation_id = c.id AND pa.account_id = $1
            JOIN conversation_participants pb ON pb.conversation_id = c.id AND pb.account_id = $2
            WHERE c.is_group = FALSE
            ORDER BY c.created_at ASC
            LIMIT 1
            "#,
        )
        .bind(account_a)
        .bind(account_b)
        .fetch_optional(pool)
        .await?;

        if let Some(conversation) = existing {
            return Ok((conversation, false));
        }

        let conversation =
            Self::create(pool, "", false, account_a, &[account_b]).await?;

        Ok((conversation, true))
    }
}

#[cfg(test)]
mod tests {
    // Read-state behavior needs live message rows; covered in
    // tests/messaging_tests.rs
}
