/// Meeting endpoints
///
/// # Endpoints
///
/// - `GET  /v1/projects/:id/meetings` - List a project's meetings
/// - `POST /v1/projects/:id/meetings` - Schedule one (owner or team member)
/// - `GET  /v1/meetings/:id` - Meeting detail with participants
/// - `DELETE /v1/meetings/:id` - Cancel (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::{
        meeting::{CreateMeeting, Meeting},
        project::Project,
        team::Team,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Meeting creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleMeetingRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub scheduled_at: DateTime<Utc>,

    /// Physical location, if meeting in person
    pub location: Option<String>,

    /// Remote link, if meeting online
    pub meeting_link: Option<String>,

    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}

/// Meeting detail with its participant set
#[derive(Debug, Serialize)]
pub struct MeetingDetail {
    pub meeting: Meeting,
    pub participant_ids: Vec<Uuid>,
}

async fn load_project(state: &AppState, id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

pub async fn list_project_meetings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Meeting>>> {
    load_project(&state, id).await?;

    let meetings = Meeting::list_for_project(&state.db, id).await?;
    Ok(Json(meetings))
}

/// Schedule a meeting (owner or team member)
///
/// # Errors
///
/// - `400 Bad Request`: neither a location nor a link was given
pub async fn schedule_meeting(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<ScheduleMeetingRequest>,
) -> ApiResult<Json<MeetingDetail>> {
    req.validate().map_err(ApiError::from_validation)?;

    if req.location.is_none() && req.meeting_link.is_none() {
        return Err(ApiError::BadRequest(
            "A meeting needs a location or a meeting link".to_string(),
        ));
    }

    let project = load_project(&state, id).await?;

    let is_owner = project.owner_id == auth.account_id;
    let is_member = match Team::find_by_project(&state.db, project.id).await? {
        Some(team) => Team::is_member(&state.db, team.id, auth.account_id).await?,
        None => false,
    };

    if !(is_owner || is_member) {
        return Err(ApiError::Forbidden(
            "Only the project owner or team members can schedule meetings".to_string(),
        ));
    }

    let meeting = Meeting::create(
        &state.db,
        CreateMeeting {
            project_id: id,
            title: req.title,
            scheduled_at: req.scheduled_at,
            location: req.location,
            meeting_link: req.meeting_link,
            participant_ids: req.participant_ids,
        },
    )
    .await?;

    let participant_ids = Meeting::participants(&state.db, meeting.id).await?;

    Ok(Json(MeetingDetail {
        meeting,
        participant_ids,
    }))
}

pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MeetingDetail>> {
    let meeting = Meeting::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meeting not found".to_string()))?;

    let participant_ids = Meeting::participants(&state.db, meeting.id).await?;

    Ok(Json(MeetingDetail {
        meeting,
        participant_ids,
    }))
}

/// Cancel a meeting (owner only)
pub async fn cancel_meeting(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let meeting = Meeting::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meeting not found".to_string()))?;

    let project = load_project(&state, meeting.project_id).await?;
    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can cancel meetings".to_string(),
        ));
    }

    Meeting::delete(&state.db, meeting.id).await?;

    Ok(Json(serde_json::json!({
        "message": "Meeting cancelled successfully"
    })))
}
