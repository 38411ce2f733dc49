/// Project model and database operations
///
/// Projects are posted by students, optionally supervised by faculty, and
/// recruit members through the join-request workflow. Every project has
/// exactly one team, created alongside it.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_category AS ENUM (
///     'engineering', 'design', 'health', 'business', 'ai',
///     'web', 'mobile', 'research', 'other'
/// );
/// CREATE TYPE project_status AS ENUM ('draft', 'in_progress', 'completed', 'cancelled');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     category project_category NOT NULL DEFAULT 'other',
///     status project_status NOT NULL DEFAULT 'draft',
///     owner_id UUID NOT NULL REFERENCES students(account_id) ON DELETE CASCADE,
///     supervisor_id UUID REFERENCES faculty(account_id) ON DELETE SET NULL,
///     required_skills JSONB NOT NULL DEFAULT '[]',
///     max_team_size INTEGER NOT NULL DEFAULT 5,
///     start_date DATE,
///     expected_duration VARCHAR(50) NOT NULL DEFAULT '',
///     tags JSONB NOT NULL DEFAULT '[]',
///     posted_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Engineering,
    Design,
    Health,
    Business,
    Ai,
    Web,
    Mobile,
    Research,
    Other,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Engineering => "engineering",
            ProjectCategory::Design => "design",
            ProjectCategory::Health => "health",
            ProjectCategory::Business => "business",
            ProjectCategory::Ai => "ai",
            ProjectCategory::Web => "web",
            ProjectCategory::Mobile => "mobile",
            ProjectCategory::Research => "research",
            ProjectCategory::Other => "other",
        }
    }
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Posted but not yet started
    Draft,

    /// Actively being worked on
    InProgress,

    /// Closed out successfully
    Completed,

    /// Abandoned
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the project is still open for recruiting and work
    pub fn is_open(&self) -> bool {
        matches!(self, ProjectStatus::Draft | ProjectStatus::InProgress)
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Full description
    pub description: String,

    /// Category used for browsing/filtering
    pub category: ProjectCategory,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Owning student (account ID)
    pub owner_id: Uuid,

    /// Supervising faculty member, if any
    pub supervisor_id: Option<Uuid>,

    /// Skills the owner is recruiting for (JSON array of strings)
    pub required_skills: serde_json::Value,

    /// Team capacity; the owner is not counted against it
    pub max_team_size: i32,

    /// Planned start date
    pub start_date: Option<NaiveDate>,

    /// Free-text duration estimate (e.g., "1 semester")
    pub expected_duration: String,

    /// Tag list (JSON array of strings)
    pub tags: serde_json::Value,

    /// When the project was posted
    pub posted_date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub category: ProjectCategory,
    pub owner_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    #[serde(default = "empty_list")]
    pub required_skills: serde_json::Value,
    #[serde(default = "default_max_team_size")]
    pub max_team_size: i32,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub expected_duration: String,
    #[serde(default = "empty_list")]
    pub tags: serde_json::Value,
}

/// Input for updating a project; only non-None fields are updated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub supervisor_id: Option<Option<Uuid>>,
    pub required_skills: Option<serde_json::Value>,
    pub max_team_size: Option<i32>,
    pub start_date: Option<Option<NaiveDate>>,
    pub expected_duration: Option<String>,
    pub tags: Option<serde_json::Value>,
}

fn empty_list() -> serde_json::Value {
    serde_json::Value::Array(vec![])
}

fn default_max_team_size() -> i32 {
    5
}

/// Filters for the project listing
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,

    /// Each listed skill must be present in required_skills
    pub skills: Vec<String>,

    /// Case-insensitive substring match on title or description
    pub search: Option<String>,

    /// Restrict to projects owned by this student
    pub owner_id: Option<Uuid>,

    /// Restrict to projects supervised by this faculty member
    pub supervisor_id: Option<Uuid>,
}

const PROJECT_COLUMNS: &str = "id, title, description, category, status, owner_id, \
     supervisor_id, required_skills, max_team_size, start_date, expected_duration, \
     tags, posted_date, created_at, updated_at";

impl Project {
    /// Creates a new project together with its (empty) team
    ///
    /// The team is created in the same transaction with capacity equal to
    /// `max_team_size`, so every project has a team from the moment it
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (title, description, category, owner_id, supervisor_id,
                                  required_skills, max_team_size, start_date,
                                  expected_duration, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.owner_id)
        .bind(data.supervisor_id)
        .bind(data.required_skills)
        .bind(data.max_team_size)
        .bind(data.start_date)
        .bind(data.expected_duration)
        .bind(data.tags)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO teams (project_id, max_members) VALUES ($1, $2)")
            .bind(project.id)
            .bind(project.max_team_size)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists projects matching the filters, newest first
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE TRUE");
        let mut bind_count = 0;

        if filter.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND category = ${}", bind_count));
        }
        if filter.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        for _ in &filter.skills {
            bind_count += 1;
            query.push_str(&format!(" AND required_skills @> ${}", bind_count));
        }
        if filter.search.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (title ILIKE ${0} OR description ILIKE ${0})",
                bind_count
            ));
        }
        if filter.owner_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND owner_id = ${}", bind_count));
        }
        if filter.supervisor_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND supervisor_id = ${}", bind_count));
        }
        query.push_str(" ORDER BY posted_date DESC");

        let mut q = sqlx::query_as::<_, Project>(&query);
        if let Some(category) = filter.category {
            q = q.bind(category);
        }
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        for skill in &filter.skills {
            q = q.bind(serde_json::json!([skill]));
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }
        if let Some(owner_id) = filter.owner_id {
            q = q.bind(owner_id);
        }
        if let Some(supervisor_id) = filter.supervisor_id {
            q = q.bind(supervisor_id);
        }

        q.fetch_all(pool).await
    }

    /// Updates a project
    ///
    /// Only non-None fields are updated; `updated_at` is stamped. Returns
    /// the updated project if found, None otherwise.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.supervisor_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", supervisor_id = ${}", bind_count));
        }
        if data.required_skills.is_some() {
            bind_count += 1;
            query.push_str(&format!(", required_skills = ${}", bind_count));
        }
        if data.max_team_size.is_some() {
            bind_count += 1;
            query.push_str(&format!(", max_team_size = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.expected_duration.is_some() {
            bind_count += 1;
            query.push_str(&format!(", expected_duration = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {PROJECT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(supervisor_id) = data.supervisor_id {
            q = q.bind(supervisor_id);
        }
        if let Some(required_skills) = data.required_skills {
            q = q.bind(required_skills);
        }
        if let Some(max_team_size) = data.max_team_size {
            q = q.bind(max_team_size);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(expected_duration) = data.expected_duration {
            q = q.bind(expected_duration);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }

        q.fetch_optional(pool).await
    }

    /// Marks a project completed
    ///
    /// Returns the updated project if found, None otherwise.
    pub async fn close(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// The team, memberships, milestones, tasks, meetings, feedback, and
    /// join requests all cascade.
    ///
    /// Returns true if a project was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_category_as_str() {
        assert_eq!(ProjectCategory::Engineering.as_str(), "engineering");
        assert_eq!(ProjectCategory::Ai.as_str(), "ai");
        assert_eq!(ProjectCategory::Other.as_str(), "other");
    }

    #[test]
    fn test_project_status_as_str() {
        assert_eq!(ProjectStatus::Draft.as_str(), "draft");
        assert_eq!(ProjectStatus::InProgress.as_str(), "in_progress");
        assert_eq!(ProjectStatus::Completed.as_str(), "completed");
        assert_eq!(ProjectStatus::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_project_status_is_open() {
        assert!(ProjectStatus::Draft.is_open());
        assert!(ProjectStatus::InProgress.is_open());
        assert!(!ProjectStatus::Completed.is_open());
        assert!(!ProjectStatus::Cancelled.is_open());
    }

    #[test]
    fn test_create_project_defaults() {
        assert_eq!(default_max_team_size(), 5);
        assert_eq!(empty_list(), serde_json::json!([]));
    }

    #[test]
    fn test_update_project_default_is_noop() {
        let update = UpdateProject::default();
        assert!(update.title.is_none());
        assert!(update.status.is_none());
        assert!(update.max_team_size.is_none());
    }
}
