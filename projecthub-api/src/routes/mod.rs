/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, session endpoints
/// - `students` / `faculty`: Profile directories
/// - `projects`: Project registry and its child resources
/// - `join_requests`: The approval workflow
/// - `teams`: Roster management
/// - `milestones`, `tasks`, `meetings`: Project trackers
/// - `messaging`: Conversations and messages

pub mod auth;
pub mod faculty;
pub mod health;
pub mod join_requests;
pub mod meetings;
pub mod messaging;
pub mod milestones;
pub mod projects;
pub mod students;
pub mod tasks;
pub mod teams;
