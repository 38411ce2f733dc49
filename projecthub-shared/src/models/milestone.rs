/// Milestone model
///
/// Milestones are dated project checkpoints with a completion flag.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE milestones (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     description TEXT NOT NULL,
///     due_date DATE NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Milestone model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Milestone {
    pub id: Uuid,
    pub project_id: Uuid,
    pub description: String,
    pub due_date: NaiveDate,
    pub is_completed: bool,

    /// Set when the milestone is marked complete
    pub completed_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress summary over a project's milestones
#[derive(Debug, Clone, Serialize)]
pub struct MilestoneProgress {
    pub total: i64,
    pub completed: i64,
    pub percentage: f64,
}

impl MilestoneProgress {
    /// Completion percentage, rounded to two decimals; 0 when there are no
    /// milestones
    pub fn from_counts(total: i64, completed: i64) -> Self {
        let percentage = if total > 0 {
            ((completed as f64 / total as f64) * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            percentage,
        }
    }
}

const MILESTONE_COLUMNS: &str = "id, project_id, description, due_date, is_completed, \
     completed_date, created_at, updated_at";

impl Milestone {
    /// Creates a milestone under a project
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        description: &str,
        due_date: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        let milestone = sqlx::query_as::<_, Milestone>(&format!(
            r#"
            INSERT INTO milestones (project_id, description, due_date)
            VALUES ($1, $2, $3)
            RETURNING {MILESTONE_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(description)
        .bind(due_date)
        .fetch_one(pool)
        .await?;

        Ok(milestone)
    }

    /// Finds a milestone by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let milestone = sqlx::query_as::<_, Milestone>(&format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(milestone)
    }

    /// Lists a project's milestones by due date
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let milestones = sqlx::query_as::<_, Milestone>(&format!(
            r#"
            SELECT {MILESTONE_COLUMNS} FROM milestones
            WHERE project_id = $1
            ORDER BY due_date ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(milestones)
    }

    /// Marks a milestone complete, stamping the completion time
    ///
    /// Returns the updated milestone if found, None otherwise.
    pub async fn mark_complete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let milestone = sqlx::query_as::<_, Milestone>(&format!(
            r#"
            UPDATE milestones
            SET is_completed = TRUE, completed_date = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {MILESTONE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(milestone)
    }

    /// Updates description/due date
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        description: Option<&str>,
        due_date: Option<NaiveDate>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let milestone = sqlx::query_as::<_, Milestone>(&format!(
            r#"
            UPDATE milestones
            SET description = COALESCE($2, description),
                due_date = COALESCE($3, due_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MILESTONE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(description)
        .bind(due_date)
        .fetch_optional(pool)
        .await?;

        Ok(milestone)
    }

    /// Deletes a milestone; returns true if a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Progress summary for a project
    pub async fn progress_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<MilestoneProgress, sqlx::Error> {
        let (total, completed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE is_completed)
            FROM milestones
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(MilestoneProgress::from_counts(total, completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_counts() {
        let progress = MilestoneProgress::from_counts(4, 1);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.percentage, 25.0);
    }

    #[test]
    fn test_progress_rounds_to_two_decimals() {
        let progress = MilestoneProgress::from_counts(3, 1);
        assert_eq!(progress.percentage, 33.33);
    }

    #[test]
    fn test_progress_empty_project() {
        let progress = MilestoneProgress::from_counts(0, 0);
        assert_eq!(progress.percentage, 0.0);
    }
}
