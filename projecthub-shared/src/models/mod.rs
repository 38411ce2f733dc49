/// Database models for ProjectHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `account`: Platform logins with a student/faculty role tag
/// - `student`: Student profiles (1:1 with an account)
/// - `faculty`: Faculty profiles (1:1 with an account)
/// - `project`: Student-owned projects, optionally faculty-supervised
/// - `team`: Capacity-bounded rosters, one per project
/// - `join_request`: The submit → approve/reject workflow
/// - `milestone`: Dated project checkpoints
/// - `project_task`: Lightweight work items with assignee/status/priority
/// - `meeting`: Scheduled meetings with participant sets
/// - `feedback`: Faculty feedback on projects
/// - `conversation`: Message threads with shared read-state tracking
/// - `message`: Individual messages
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
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod conversation;
pub mod faculty;
pub mod feedback;
pub mod join_request;
pub mod meeting;
pub mod message;
pub mod milestone;
pub mod project;
pub mod project_task;
pub mod student;
pub mod team;
