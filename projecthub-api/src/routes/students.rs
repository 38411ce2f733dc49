/// Student profile directory endpoints
///
/// # Endpoints
///
/// - `GET /v1/students` - List student profiles (filters: department, year, skills)
/// - `GET /v1/students/:id` - Get one profile
/// - `PUT /v1/students/me` - Update the caller's own profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::student::{Student, StudentFilter, StudyYear, UpdateStudent},
};
use serde::Deserialize;
use uuid::Uuid;

/// Directory query parameters
#[derive(Debug, Deserialize)]
pub struct StudentListQuery {
    pub department: Option<String>,
    pub year: Option<StudyYear>,

    /// Comma-separated skill list; every listed skill must match
    pub skills: Option<String>,
}

/// Own-profile update payload
#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub department: Option<String>,
    pub year: Option<StudyYear>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> ApiResult<Json<Vec<Student>>> {
    let filter = StudentFilter {
        department: query.department,
        year: query.year,
        skills: query
            .skills
            .map(|s| {
                s.split(',')
                    .map(|skill| skill.trim().to_string())
                    .filter(|skill| !skill.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    let students = Student::list(&state.db, &filter).await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Student>> {
    let student = Student::find_by_account(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(student))
}

/// Update the caller's own student profile
///
/// # Errors
///
/// - `403 Forbidden`: the caller is not a student
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateStudentRequest>,
) -> ApiResult<Json<Student>> {
    if !auth.role.is_student() {
        return Err(ApiError::Forbidden("User is not a student".to_string()));
    }

    let update = UpdateStudent {
        department: req.department,
        year: req.year,
        skills: req.skills.map(|s| serde_json::json!(s)),
        interests: req.interests.map(|s| serde_json::json!(s)),
    };

    let student = Student::update(&state.db, auth.account_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student profile not found".to_string()))?;

    Ok(Json(student))
}
