/// Account model and database operations
///
/// This module provides the Account model and CRUD operations for managing
/// user accounts. Every account carries a role tag and owns exactly one
/// profile row: a student profile or a faculty profile, never both.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('student', 'faculty');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     role account_role NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use projecthub_shared::models::account::{Account, AccountRole, CreateAccount};
/// use projecthub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let account = Account::create(&pool, CreateAccount {
///     email: "ada@university.edu".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: "Ada Lovelace".to_string(),
///     role: AccountRole::Student,
/// }).await?;
///
/// let found = Account::find_by_email(&pool, "ada@university.edu").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role tag determining which profile an account owns
///
/// The role is fixed at registration time. Instead of probing for the
/// existence of a profile row, callers branch on this tag and then load the
/// matching profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Owns a student profile; can create and join projects
    Student,

    /// Owns a faculty profile; can supervise projects and give feedback
    Faculty,
}

impl AccountRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Student => "student",
            AccountRole::Faculty => "faculty",
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, AccountRole::Student)
    }

    pub fn is_faculty(&self) -> bool {
        matches!(self, AccountRole::Faculty)
    }
}

/// Account model representing a platform login
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT), unique across accounts
    pub email: String,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Role tag: student or faculty
    pub role: AccountRole,

    /// Whether the account can log in
    pub is_active: bool,

    /// When the account was registered
    pub date_joined: DateTime<Utc>,

    /// When the account last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Email address (stored case-insensitively)
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password!)
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Role tag
    pub role: AccountRole,
}

impl Account {
    /// Creates a new account
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, name, role, is_active,
                      date_joined, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   date_joined, last_login_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by email address (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, name, role, is_active,
                   date_joined, last_login_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Updates the display name
    ///
    /// Returns the updated account if found, None otherwise.
    pub async fn update_name(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = $2
            WHERE id = $1
            RETURNING id, email, password_hash, name, role, is_active,
                      date_joined, last_login_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Replaces the stored password hash
    ///
    /// Returns true if the account was found and updated.
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the last login timestamp
    ///
    /// Typically called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes an account by ID
    ///
    /// The owned profile row and everything hanging off it cascade.
    ///
    /// Returns true if an account was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
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
    fn test_account_role_as_str() {
        assert_eq!(AccountRole::Student.as_str(), "student");
        assert_eq!(AccountRole::Faculty.as_str(), "faculty");
    }

    #[test]
    fn test_account_role_predicates() {
        assert!(AccountRole::Student.is_student());
        assert!(!AccountRole::Student.is_faculty());
        assert!(AccountRole::Faculty.is_faculty());
        assert!(!AccountRole::Faculty.is_student());
    }

    #[test]
    fn test_create_account_struct() {
        let create = CreateAccount {
            email: "test@university.edu".to_string(),
            password_hash: "hash".to_string(),
            name: "Test Account".to_string(),
            role: AccountRole::Student,
        };

        assert_eq!(create.email, "test@university.edu");
        assert_eq!(create.role, AccountRole::Student);
    }

    // Integration tests for database operations are in tests/
}
