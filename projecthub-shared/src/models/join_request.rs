/// Join-request model and approval workflow
///
/// A join request is a student's application to join a project's team. It
/// moves through a small state machine and, on approval, mutates team
/// membership:
///
/// ```text
/// pending → approved
///         → rejected
/// ```
///
/// Terminal states are final. Re-requesting after a rejection creates a new
/// record: the uniqueness constraint on (project, student) excludes rejected
/// rows.
///
/// Approval re-checks team capacity at approval time (it may have changed
/// since submission) and runs the whole read-check-write sequence in one
/// transaction with a row lock on the team, so two concurrent approvals
/// cannot both claim the last open slot. If the membership insert does not
/// land (the student is already a member, or is the project owner), the
/// transaction rolls back and the request stays `pending`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE request_status AS ENUM ('pending', 'approved', 'rejected');
///
/// CREATE TABLE join_requests (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     student_id UUID NOT NULL REFERENCES students(account_id) ON DELETE CASCADE,
///     status request_status NOT NULL DEFAULT 'pending',
///     message TEXT NOT NULL DEFAULT '',
///     response_message TEXT NOT NULL DEFAULT '',
///     request_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     response_date TIMESTAMPTZ
/// );
///
/// CREATE UNIQUE INDEX idx_join_requests_open_pair
///     ON join_requests (project_id, student_id)
///     WHERE status <> 'rejected';
/// ```
///
/// # Example
///
/// ```no_run
/// use projecthub_shared::models::join_request::JoinRequest;
/// use projecthub_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// # let (project_id, student_id) = (Uuid::new_v4(), Uuid::new_v4());
///
/// let request = JoinRequest::submit(&pool, project_id, student_id, "I know Rust").await?;
/// let approved = JoinRequest::approve(&pool, request.id, Some("Welcome aboard")).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use super::team::Team;

/// Join-request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for the project owner to respond
    Pending,

    /// Accepted; the student was added to the team
    Approved,

    /// Declined; the student may submit a new request
    Rejected,
}

impl RequestStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Checks if the status is terminal (no further transition permitted)
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    /// Checks if transition to the target status is valid
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        matches!(
            (self, target),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for the join-request workflow
///
/// Every failure here is caller/input-driven; none are transient and none
/// are retried.
#[derive(Debug, thiserror::Error)]
pub enum JoinRequestError {
    /// A student may not request to join their own project
    #[error("you cannot send a join request to your own project")]
    SelfJoin,

    /// A non-rejected request already exists for this (project, student) pair
    #[error("you have already sent a request to this project")]
    DuplicateRequest,

    /// The project's team has no open slot
    #[error("the team is already full")]
    TeamFull,

    /// The request is not in a state that permits this operation
    #[error("only pending requests can be updated (current status: {0})")]
    InvalidState(RequestStatus),

    /// The membership insert did not land (already a member, or the student
    /// owns the project); the request stays pending
    #[error("student could not be added to the team")]
    MemberNotAdded,

    /// No join request with the given ID
    #[error("join request not found")]
    NotFound,

    /// The referenced project no longer exists
    #[error("project not found")]
    ProjectNotFound,

    /// Underlying storage failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Join-request model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JoinRequest {
    /// Unique request ID
    pub id: Uuid,

    /// Target project
    pub project_id: Uuid,

    /// Requesting student (account ID)
    pub student_id: Uuid,

    /// Current state
    pub status: RequestStatus,

    /// Message from the student to the owner
    pub message: String,

    /// Owner's response message (set on approve/reject)
    pub response_message: String,

    /// When the request was submitted
    pub request_date: DateTime<Utc>,

    /// When the owner responded (None while pending)
    pub response_date: Option<DateTime<Utc>>,
}

const REQUEST_COLUMNS: &str = "id, project_id, student_id, status, message, \
     response_message, request_date, response_date";

impl JoinRequest {
    /// Submits a new join request for a project
    ///
    /// # Errors
    ///
    /// - [`JoinRequestError::ProjectNotFound`] if the project does not exist
    /// - [`JoinRequestError::SelfJoin`] if the student owns the project
    /// - [`JoinRequestError::DuplicateRequest`] if a non-rejected request
    ///   for the same pair already exists
    /// - [`JoinRequestError::TeamFull`] if the team has no open slot
    pub async fn submit(
        pool: &PgPool,
        project_id: Uuid,
        student_id: Uuid,
        message: &str,
    ) -> Result<Self, JoinRequestError> {
        let (owner_id, max_team_size): (Uuid, i32) =
            sqlx::query_as("SELECT owner_id, max_team_size FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(pool)
                .await?
                .ok_or(JoinRequestError::ProjectNotFound)?;

        if student_id == owner_id {
            return Err(JoinRequestError::SelfJoin);
        }

        let duplicate: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM join_requests
                WHERE project_id = $1 AND student_id = $2 AND status <> 'rejected'
            )
            "#,
        )
        .bind(project_id)
        .bind(student_id)
        .fetch_one(pool)
        .await?;

        if duplicate {
            return Err(JoinRequestError::DuplicateRequest);
        }

        if let Some(team) = Team::find_by_project(pool, project_id).await? {
            let mut conn = pool.acquire().await?;
            let count = Team::member_count(&mut conn, team.id).await?;
            if team.is_full(count) {
                return Err(JoinRequestError::TeamFull);
            }
        } else if max_team_size <= 0 {
            return Err(JoinRequestError::TeamFull);
        }

        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            INSERT INTO join_requests (project_id, student_id, message)
            VALUES ($1, $2, $3)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(student_id)
        .bind(message)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            // Lost the race with a concurrent submit for the same pair
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint().is_some() {
                    return JoinRequestError::DuplicateRequest;
                }
            }
            JoinRequestError::Database(e)
        })?;

        Ok(request)
    }

    /// Approves a pending request, adding the student to the project's team
    ///
    /// The status check, capacity check, membership insert, and status
    /// update run in a single transaction with the team row locked, so a
    /// concurrent approval of another request for the same team serializes
    /// behind this one and sees the updated member count. On any failure the
    /// transaction rolls back and the request remains `pending`.
    ///
    /// # Errors
    ///
    /// - [`JoinRequestError::NotFound`] if the request does not exist
    /// - [`JoinRequestError::InvalidState`] if the request is not pending
    /// - [`JoinRequestError::TeamFull`] if the team has no open slot at
    ///   approval time (capacity is re-checked, not assumed from submission)
    /// - [`JoinRequestError::MemberNotAdded`] if the membership insert was a
    ///   no-op (already a member, or the student owns the project)
    pub async fn approve(
        pool: &PgPool,
        id: Uuid,
        response_message: Option<&str>,
    ) -> Result<Self, JoinRequestError> {
        let mut tx = pool.begin().await?;

        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(JoinRequestError::NotFound)?;

        if request.status != RequestStatus::Pending {
            return Err(JoinRequestError::InvalidState(request.status));
        }

        let (owner_id, max_team_size): (Uuid, i32) =
            sqlx::query_as("SELECT owner_id, max_team_size FROM projects WHERE id = $1")
                .bind(request.project_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(JoinRequestError::ProjectNotFound)?;

        let team =
            Team::find_or_create_locked(&mut *tx, request.project_id, max_team_size).await?;

        let count = Team::member_count(&mut *tx, team.id).await?;
        if team.is_full(count) {
            return Err(JoinRequestError::TeamFull);
        }

        let added = Team::add_member(&mut *tx, &team, request.student_id, owner_id).await?;
        if !added {
            return Err(JoinRequestError::MemberNotAdded);
        }

        let approved = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
            SET status = 'approved',
                response_message = COALESCE($2, response_message),
                response_date = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(response_message)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(approved)
    }

    /// Rejects a pending request
    ///
    /// # Errors
    ///
    /// - [`JoinRequestError::NotFound`] if the request does not exist
    /// - [`JoinRequestError::InvalidState`] if the request is not pending
    pub async fn reject(
        pool: &PgPool,
        id: Uuid,
        response_message: Option<&str>,
    ) -> Result<Self, JoinRequestError> {
        let rejected = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
            SET status = 'rejected',
                response_message = COALESCE($2, response_message),
                response_date = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(response_message)
        .fetch_optional(pool)
        .await?;

        match rejected {
            Some(request) => Ok(request),
            // Distinguish a missing row from a non-pending one
            None => match Self::find_by_id(pool, id).await? {
                Some(request) => Err(JoinRequestError::InvalidState(request.status)),
                None => Err(JoinRequestError::NotFound),
            },
        }
    }

    /// Finds a request by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(request)
    }

    /// Lists requests against a project, newest first, optionally filtered
    /// by status
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
        status: Option<RequestStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let requests = match status {
            Some(status) => {
                sqlx::query_as::<_, JoinRequest>(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM join_requests
                    WHERE project_id = $1 AND status = $2
                    ORDER BY request_date DESC
                    "#
                ))
                .bind(project_id)
                .bind(status)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, JoinRequest>(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM join_requests
                    WHERE project_id = $1
                    ORDER BY request_date DESC
                    "#
                ))
                .bind(project_id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(requests)
    }

    /// Lists requests visible to a student: the ones they sent plus the ones
    /// against projects they own
    pub async fn list_visible_to_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let requests = sqlx::query_as::<_, JoinRequest>(
            r#"
            SELECT jr.id, jr.project_id, jr.student_id, jr.status, jr.message,
                   jr.response_message, jr.request_date, jr.response_date
            FROM join_requests jr
            JOIN projects p ON p.id = jr.project_id
            WHERE jr.student_id = $1 OR p.owner_id = $1
            ORDER BY jr.request_date DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;

        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_as_str() {
        assert_eq!(RequestStatus::Pending.as_str(), "pending");
        assert_eq!(RequestStatus::Approved.as_str(), "approved");
        assert_eq!(RequestStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
    }

    #[test]
    fn test_terminal_states_cannot_transition() {
        for from in [RequestStatus::Approved, RequestStatus::Rejected] {
            for to in [
                RequestStatus::Pending,
                RequestStatus::Approved,
                RequestStatus::Rejected,
            ] {
                assert!(!from.can_transition_to(to), "{} -> {} must be invalid", from, to);
            }
        }
    }

    #[test]
    fn test_pending_cannot_loop() {
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            JoinRequestError::SelfJoin.to_string(),
            "you cannot send a join request to your own project"
        );
        assert_eq!(
            JoinRequestError::InvalidState(RequestStatus::Approved).to_string(),
            "only pending requests can be updated (current status: approved)"
        );
        assert_eq!(JoinRequestError::TeamFull.to_string(), "the team is already full");
    }

    // Workflow tests (submit/approve/reject against a real schema) are in
    // tests/join_request_tests.rs
}
