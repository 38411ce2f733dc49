/// Feedback model
///
/// Faculty members leave free-text feedback on projects they can see.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE feedback (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     faculty_id UUID NOT NULL REFERENCES faculty(account_id) ON DELETE CASCADE,
///     comments TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Feedback entry on a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub project_id: Uuid,
    pub faculty_id: Uuid,
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Creates a feedback entry
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        faculty_id: Uuid,
        comments: &str,
    ) -> Result<Self, sqlx::Error> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (project_id, faculty_id, comments)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, faculty_id, comments, created_at, updated_at
            "#,
        )
        .bind(project_id)
        .bind(faculty_id)
        .bind(comments)
        .fetch_one(pool)
        .await?;

        Ok(feedback)
    }

    /// Lists a project's feedback, newest first
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, project_id, faculty_id, comments, created_at, updated_at
            FROM feedback
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(feedback)
    }

    /// Deletes a feedback entry; returns true if a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
