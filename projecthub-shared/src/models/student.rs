/// Student profile model and database operations
///
/// A student profile is keyed by its owning account and carries the academic
/// metadata used for project matching: department, study year, and skills.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE study_year AS ENUM ('first', 'second', 'third', 'fourth', 'graduate');
///
/// CREATE TABLE students (
///     account_id UUID PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
///     student_number VARCHAR(50) NOT NULL UNIQUE,
///     department VARCHAR(255) NOT NULL,
///     year study_year NOT NULL,
///     skills JSONB NOT NULL DEFAULT '[]',
///     interests JSONB NOT NULL DEFAULT '[]'
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Study year of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "study_year", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudyYear {
    First,
    Second,
    Third,
    Fourth,
    Graduate,
}

impl StudyYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyYear::First => "first",
            StudyYear::Second => "second",
            StudyYear::Third => "third",
            StudyYear::Fourth => "fourth",
            StudyYear::Graduate => "graduate",
        }
    }
}

/// Student profile, 1:1 with an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    /// Owning account ID (also the primary key)
    pub account_id: Uuid,

    /// University-issued student identifier, unique
    pub student_number: String,

    /// Department name
    pub department: String,

    /// Current study year
    pub year: StudyYear,

    /// Skill list (JSON array of strings)
    pub skills: serde_json::Value,

    /// Interest list (JSON array of strings)
    pub interests: serde_json::Value,
}

/// Input for creating a student profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudent {
    pub account_id: Uuid,
    pub student_number: String,
    pub department: String,
    pub year: StudyYear,
    #[serde(default = "empty_list")]
    pub skills: serde_json::Value,
    #[serde(default = "empty_list")]
    pub interests: serde_json::Value,
}

/// Input for updating a student profile
///
/// Only non-None fields are updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudent {
    pub department: Option<String>,
    pub year: Option<StudyYear>,
    pub skills: Option<serde_json::Value>,
    pub interests: Option<serde_json::Value>,
}

fn empty_list() -> serde_json::Value {
    serde_json::Value::Array(vec![])
}

/// Filters for the student directory listing
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    /// Case-insensitive substring match on department
    pub department: Option<String>,

    /// Exact study-year match
    pub year: Option<StudyYear>,

    /// Each listed skill must be present in the profile's skill list
    pub skills: Vec<String>,
}

impl Student {
    /// Creates a student profile for an account
    ///
    /// # Errors
    ///
    /// Returns an error if the account already has a profile, the student
    /// number is taken, or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateStudent) -> Result<Self, sqlx::Error> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (account_id, student_number, department, year, skills, interests)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING account_id, student_number, department, year, skills, interests
            "#,
        )
        .bind(data.account_id)
        .bind(data.student_number)
        .bind(data.department)
        .bind(data.year)
        .bind(data.skills)
        .bind(data.interests)
        .fetch_one(pool)
        .await?;

        Ok(student)
    }

    /// Finds a student profile by its owning account
    pub async fn find_by_account(
        pool: &PgPool,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT account_id, student_number, department, year, skills, interests
            FROM students
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await?;

        Ok(student)
    }

    /// Finds a student profile by student number
    pub async fn find_by_number(
        pool: &PgPool,
        student_number: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT account_id, student_number, department, year, skills, interests
            FROM students
            WHERE student_number = $1
            "#,
        )
        .bind(student_number)
        .fetch_optional(pool)
        .await?;

        Ok(student)
    }

    /// Lists student profiles matching the directory filters
    pub async fn list(pool: &PgPool, filter: &StudentFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT account_id, student_number, department, year, skills, interests \
             FROM students WHERE TRUE",
        );
        let mut bind_count = 0;

        if filter.department.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND department ILIKE ${}", bind_count));
        }
        if filter.year.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND year = ${}", bind_count));
        }
        for _ in &filter.skills {
            bind_count += 1;
            query.push_str(&format!(" AND skills @> ${}", bind_count));
        }
        query.push_str(" ORDER BY student_number ASC");

        let mut q = sqlx::query_as::<_, Student>(&query);
        if let Some(ref department) = filter.department {
            q = q.bind(format!("%{}%", department));
        }
        if let Some(year) = filter.year {
            q = q.bind(year);
        }
        for skill in &filter.skills {
            q = q.bind(serde_json::json!([skill]));
        }

        q.fetch_all(pool).await
    }

    /// Updates a student profile
    ///
    /// Only non-None fields are updated. Returns the updated profile if
    /// found, None otherwise.
    pub async fn update(
        pool: &PgPool,
        account_id: Uuid,
        data: UpdateStudent,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE students SET account_id = account_id");
        let mut bind_count = 1;

        if data.department.is_some() {
            bind_count += 1;
            query.push_str(&format!(", department = ${}", bind_count));
        }
        if data.year.is_some() {
            bind_count += 1;
            query.push_str(&format!(", year = ${}", bind_count));
        }
        if data.skills.is_some() {
            bind_count += 1;
            query.push_str(&format!(", skills = ${}", bind_count));
        }
        if data.interests.is_some() {
            bind_count += 1;
            query.push_str(&format!(", interests = ${}", bind_count));
        }

        query.push_str(
            " WHERE account_id = $1 \
             RETURNING account_id, student_number, department, year, skills, interests",
        );

        let mut q = sqlx::query_as::<_, Student>(&query).bind(account_id);

        if let Some(department) = data.department {
            q = q.bind(department);
        }
        if let Some(year) = data.year {
            q = q.bind(year);
        }
        if let Some(skills) = data.skills {
            q = q.bind(skills);
        }
        if let Some(interests) = data.interests {
            q = q.bind(interests);
        }

        q.fetch_optional(pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_year_as_str() {
        assert_eq!(StudyYear::First.as_str(), "first");
        assert_eq!(StudyYear::Graduate.as_str(), "graduate");
    }

    #[test]
    fn test_update_student_default() {
        let update = UpdateStudent::default();
        assert!(update.department.is_none());
        assert!(update.year.is_none());
        assert!(update.skills.is_none());
        assert!(update.interests.is_none());
    }

    #[test]
    fn test_empty_list_default() {
        assert_eq!(empty_list(), serde_json::json!([]));
    }
}
