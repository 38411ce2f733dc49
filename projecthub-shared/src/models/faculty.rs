/// Faculty profile model and database operations
///
/// A faculty profile is keyed by its owning account. Faculty members
/// supervise projects and leave feedback; they never appear in team rosters.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE faculty (
///     account_id UUID PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
///     faculty_number VARCHAR(50) NOT NULL UNIQUE,
///     department VARCHAR(255) NOT NULL,
///     title VARCHAR(100) NOT NULL DEFAULT '',
///     specialization TEXT NOT NULL DEFAULT '',
///     office_location VARCHAR(255) NOT NULL DEFAULT ''
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Faculty profile, 1:1 with an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Faculty {
    /// Owning account ID (also the primary key)
    pub account_id: Uuid,

    /// University-issued faculty identifier, unique
    pub faculty_number: String,

    /// Department name
    pub department: String,

    /// Academic title (e.g., "Assoc. Prof."), may be empty
    pub title: String,

    /// Free-text research/teaching specialization
    pub specialization: String,

    /// Office location, may be empty
    pub office_location: String,
}

/// Input for creating a faculty profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFaculty {
    pub account_id: Uuid,
    pub faculty_number: String,
    pub department: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub office_location: String,
}

/// Input for updating a faculty profile; only non-None fields are updated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFaculty {
    pub department: Option<String>,
    pub title: Option<String>,
    pub specialization: Option<String>,
    pub office_location: Option<String>,
}

/// Filters for the faculty directory listing
#[derive(Debug, Clone, Default)]
pub struct FacultyFilter {
    /// Case-insensitive substring match on department
    pub department: Option<String>,

    /// Case-insensitive substring match on title
    pub title: Option<String>,
}

impl Faculty {
    /// Creates a faculty profile for an account
    pub async fn create(pool: &PgPool, data: CreateFaculty) -> Result<Self, sqlx::Error> {
        let faculty = sqlx::query_as::<_, Faculty>(
            r#"
            INSERT INTO faculty (account_id, faculty_number, department, title,
                                 specialization, office_location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING account_id, faculty_number, department, title,
                      specialization, office_location
            "#,
        )
        .bind(data.account_id)
        .bind(data.faculty_number)
        .bind(data.department)
        .bind(data.title)
        .bind(data.specialization)
        .bind(data.office_location)
        .fetch_one(pool)
        .await?;

        Ok(faculty)
    }

    /// Finds a faculty profile by its owning account
    pub async fn find_by_account(
        pool: &PgPool,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let faculty = sqlx::query_as::<_, Faculty>(
            r#"
            SELECT account_id, faculty_number, department, title,
                   specialization, office_location
            FROM faculty
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await?;

        Ok(faculty)
    }

    /// Lists faculty profiles matching the directory filters
    pub async fn list(pool: &PgPool, filter: &FacultyFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT account_id, faculty_number, department, title, \
             specialization, office_location \
             FROM faculty WHERE TRUE",
        );
        let mut bind_count = 0;

        if filter.department.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND department ILIKE ${}", bind_count));
        }
        if filter.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND title ILIKE ${}", bind_count));
        }
        query.push_str(" ORDER BY faculty_number ASC");

        let mut q = sqlx::query_as::<_, Faculty>(&query);
        if let Some(ref department) = filter.department {
            q = q.bind(format!("%{}%", department));
        }
        if let Some(ref title) = filter.title {
            q = q.bind(format!("%{}%", title));
        }

        q.fetch_all(pool).await
    }

    /// Updates a faculty profile; returns the updated row if found
    pub async fn update(
        pool: &PgPool,
        account_id: Uuid,
        data: UpdateFaculty,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE faculty SET account_id = account_id");
        let mut bind_count = 1;

        if data.department.is_some() {
            bind_count += 1;
            query.push_str(&format!(", department = ${}", bind_count));
        }
        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.specialization.is_some() {
            bind_count += 1;
            query.push_str(&format!(", specialization = ${}", bind_count));
        }
        if data.office_location.is_some() {
            bind_count += 1;
            query.push_str(&format!(", office_location = ${}", bind_count));
        }

        query.push_str(
            " WHERE account_id = $1 \
             RETURNING account_id, faculty_number, department, title, \
             specialization, office_location",
        );

        let mut q = sqlx::query_as::<_, Faculty>(&query).bind(account_id);

        if let Some(department) = data.department {
            q = q.bind(department);
        }
        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(specialization) = data.specialization {
            q = q.bind(specialization);
        }
        if let Some(office_location) = data.office_location {
            q = q.bind(office_location);
        }

        q.fetch_optional(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_faculty_default() {
        let update = UpdateFaculty::default();
        assert!(update.department.is_none());
        assert!(update.title.is_none());
        assert!(update.specialization.is_none());
        assert!(update.office_location.is_none());
    }
}
