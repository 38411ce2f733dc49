/// Faculty profile directory endpoints
///
/// # Endpoints
///
/// - `GET /v1/faculty` - List faculty profiles (filters: department, title)
/// - `GET /v1/faculty/:id` - Get one profile
/// - `PUT /v1/faculty/me` - Update the caller's own profile

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
    models::faculty::{Faculty, FacultyFilter, UpdateFaculty},
};
use serde::Deserialize;
use uuid::Uuid;

/// Directory query parameters
#[derive(Debug, Deserialize)]
pub struct FacultyListQuery {
    pub department: Option<String>,
    pub title: Option<String>,
}

pub async fn list_faculty(
    State(state): State<AppState>,
    Query(query): Query<FacultyListQuery>,
) -> ApiResult<Json<Vec<Faculty>>> {
    let filter = FacultyFilter {
        department: query.department,
        title: query.title,
    };

    let faculty = Faculty::list(&state.db, &filter).await?;
    Ok(Json(faculty))
}

pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Faculty>> {
    let faculty = Faculty::find_by_account(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Faculty member not found".to_string()))?;

    Ok(Json(faculty))
}

/// Update the caller's own faculty profile
///
/// # Errors
///
/// - `403 Forbidden`: the caller is not faculty
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(update): Json<UpdateFaculty>,
) -> ApiResult<Json<Faculty>> {
    if !auth.role.is_faculty() {
        return Err(ApiError::Forbidden("User is not faculty".to_string()));
    }

    let faculty = Faculty::update(&state.db, auth.account_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Faculty profile not found".to_string()))?;

    Ok(Json(faculty))
}
