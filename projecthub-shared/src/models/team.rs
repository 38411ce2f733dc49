/// Team model and capacity management
///
/// Every project has exactly one team. Membership is capacity-bounded by the
/// project's max team size; the owning student is kept out of the member set
/// (they hold the project itself, not a roster slot). Derived values (member
/// count, available slots, is-full) are computed from the live membership
/// set on every read, never cached.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL UNIQUE REFERENCES projects(id) ON DELETE CASCADE,
///     max_members INTEGER NOT NULL DEFAULT 5,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     student_id UUID NOT NULL REFERENCES students(account_id) ON DELETE CASCADE,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, student_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Team model, 1:1 with a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Capacity; mirrors the project's max team size at creation time
    pub max_members: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single roster entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    pub team_id: Uuid,
    pub student_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl Team {
    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, project_id, max_members, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Finds the team belonging to a project
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, project_id, max_members, created_at, updated_at
            FROM teams
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Finds a project's team inside a transaction, creating it if absent
    /// and locking its row for the remainder of the transaction
    ///
    /// Teams are normally created alongside their project, so the create arm
    /// only fires for rows that predate that rule. The `FOR UPDATE` lock
    /// serializes concurrent capacity checks against the same team.
    pub async fn find_or_create_locked(
        conn: &mut PgConnection,
        project_id: Uuid,
        max_members: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO teams (project_id, max_members)
            VALUES ($1, $2)
            ON CONFLICT (project_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(max_members)
        .execute(&mut *conn)
        .await?;

        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, project_id, max_members, created_at, updated_at
            FROM teams
            WHERE project_id = $1
            FOR UPDATE
            "#,
        )
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(team)
    }

    /// Counts current members
    pub async fn member_count(conn: &mut PgConnection, team_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .fetch_one(conn)
            .await?;

        Ok(count)
    }

    /// Checks whether a student is on the roster
    pub async fn is_member(
        pool: &PgPool,
        team_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE team_id = $1 AND student_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(student_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Adds a student to the roster, failing closed
    ///
    /// Returns `Ok(false)`, without touching the roster, when:
    /// - the team is at capacity,
    /// - the student is already a member, or
    /// - the student owns the project (`owner_id`).
    ///
    /// Takes a connection rather than a pool so callers decide the
    /// transaction boundary; the approval workflow runs this inside its
    /// transaction after locking the team row.
    pub async fn add_member(
        conn: &mut PgConnection,
        team: &Team,
        student_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        if student_id == owner_id {
            return Ok(false);
        }

        let count = Self::member_count(conn, team.id).await?;
        if count >= i64::from(team.max_members) {
            return Ok(false);
        }

        // ON CONFLICT makes the double-insert case a no-op rather than an error
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, student_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id, student_id) DO NOTHING
            "#,
        )
        .bind(team.id)
        .bind(student_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a student from the roster
    ///
    /// Unconditional removal if present; no-op if absent. Protecting the
    /// project owner is the caller's responsibility.
    ///
    /// Returns true if a row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        team_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND student_id = $2")
                .bind(team_id)
                .bind(student_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists roster entries, oldest join first
    pub async fn list_members(pool: &PgPool, team_id: Uuid) -> Result<Vec<TeamMember>, sqlx::Error> {
        let members = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT team_id, student_id, joined_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Remaining open slots given the current member count
    pub fn available_slots(&self, current_count: i64) -> i64 {
        (i64::from(self.max_members) - current_count).max(0)
    }

    /// Whether the roster is at (or over) capacity given the current count
    pub fn is_full(&self, current_count: i64) -> bool {
        current_count >= i64::from(self.max_members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_with_capacity(max_members: i32) -> Team {
        Team {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            max_members,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_available_slots() {
        let team = team_with_capacity(5);
        assert_eq!(team.available_slots(0), 5);
        assert_eq!(team.available_slots(3), 2);
        assert_eq!(team.available_slots(5), 0);
    }

    #[test]
    fn test_available_slots_never_negative() {
        let team = team_with_capacity(2);
        assert_eq!(team.available_slots(7), 0);
    }

    #[test]
    fn test_is_full() {
        let team = team_with_capacity(3);
        assert!(!team.is_full(0));
        assert!(!team.is_full(2));
        assert!(team.is_full(3));
        assert!(team.is_full(4));
    }

    // Roster mutation tests require a database and live in tests/
}
