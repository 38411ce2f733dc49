/// Meeting model
///
/// Meetings are scheduled under a project, either at a physical location or
/// via a remote link, with a participant set of students.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE meetings (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     scheduled_at TIMESTAMPTZ NOT NULL,
///     location VARCHAR(255),
///     meeting_link VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE meeting_participants (
///     meeting_id UUID NOT NULL REFERENCES meetings(id) ON DELETE CASCADE,
///     student_id UUID NOT NULL REFERENCES students(account_id) ON DELETE CASCADE,
///     PRIMARY KEY (meeting_id, student_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Meeting model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,

    /// Physical location, if meeting in person
    pub location: Option<String>,

    /// Remote link, if meeting online
    pub meeting_link: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for scheduling a meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMeeting {
    pub project_id: Uuid,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}

impl Meeting {
    /// Schedules a meeting with its participant set
    pub async fn create(pool: &PgPool, data: CreateMeeting) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings (project_id, title, scheduled_at, location, meeting_link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, scheduled_at, location, meeting_link, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.scheduled_at)
        .bind(data.location)
        .bind(data.meeting_link)
        .fetch_one(&mut *tx)
        .await?;

        for student_id in &data.participant_ids {
            sqlx::query(
                r#"
                INSERT INTO meeting_participants (meeting_id, student_id)
                VALUES ($1, $2)
                ON CONFLICT (meeting_id, student_id) DO NOTHING
                "#,
            )
            .bind(meeting.id)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(meeting)
    }

    /// Finds a meeting by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, project_id, title, scheduled_at, location, meeting_link, created_at
            FROM meetings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(meeting)
    }

    /// Lists a project's meetings by schedule
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let meetings = sqlx::query_as::<_, Meeting>(
            r#"
            SELECT id, project_id, title, scheduled_at, location, meeting_link, created_at
            FROM meetings
            WHERE project_id = $1
            ORDER BY scheduled_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(meetings)
    }

    /// Lists participant student IDs
    pub async fn participants(pool: &PgPool, id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT student_id FROM meeting_participants WHERE meeting_id = $1 ORDER BY student_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Cancels (deletes) a meeting; returns true if a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
