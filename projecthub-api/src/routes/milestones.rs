/// Milestone endpoints
///
/// # Endpoints
///
/// - `POST   /v1/milestones/:id/complete` - Mark complete (owner or team member)
/// - `PUT    /v1/milestones/:id` - Update (owner only)
/// - `DELETE /v1/milestones/:id` - Delete (owner only)
///
/// Listing and creation live under `/v1/projects/:id/milestones`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::{milestone::Milestone, project::Project, team::Team},
};
use serde::Deserialize;
use uuid::Uuid;

/// Milestone update payload
#[derive(Debug, Deserialize)]
pub struct UpdateMilestoneRequest {
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Loads a milestone and its project
async fn load_milestone(state: &AppState, id: Uuid) -> ApiResult<(Milestone, Project)> {
    let milestone = Milestone::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Milestone not found".to_string()))?;

    let project = Project::find_by_id(&state.db, milestone.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok((milestone, project))
}

/// Mark a milestone complete
///
/// Allowed for the project owner and for team members.
pub async fn complete_milestone(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Milestone>> {
    let (milestone, project) = load_milestone(&state, id).await?;

    let is_owner = project.owner_id == auth.account_id;
    let is_member = match Team::find_by_project(&state.db, project.id).await? {
        Some(team) => Team::is_member(&state.db, team.id, auth.account_id).await?,
        None => false,
    };

    if !(is_owner || is_member) {
        return Err(ApiError::Forbidden(
            "Only the project owner or team members can complete milestones".to_string(),
        ));
    }

    let milestone = Milestone::mark_complete(&state.db, milestone.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Milestone not found".to_string()))?;

    Ok(Json(milestone))
}

/// Update a milestone (owner only)
pub async fn update_milestone(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMilestoneRequest>,
) -> ApiResult<Json<Milestone>> {
    let (milestone, project) = load_milestone(&state, id).await?;

    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can update milestones".to_string(),
        ));
    }

    let milestone = Milestone::update(
        &state.db,
        milestone.id,
        req.description.as_deref(),
        req.due_date,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Milestone not found".to_string()))?;

    Ok(Json(milestone))
}

/// Delete a milestone (owner only)
pub async fn delete_milestone(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let (milestone, project) = load_milestone(&state, id).await?;

    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can delete milestones".to_string(),
        ));
    }

    Milestone::delete(&state.db, milestone.id).await?;

    Ok(Json(serde_json::json!({
        "message": "Milestone deleted successfully"
    })))
}
