/// Team roster endpoints
///
/// # Endpoints
///
/// - `GET    /v1/teams/:id` - Team with roster and capacity
/// - `GET    /v1/teams/:id/members` - Roster only
/// - `POST   /v1/teams/:id/members` - Direct add (owner only)
/// - `DELETE /v1/teams/:id/members/:student_id` - Remove (owner only, never the owner)
///
/// Direct adds go through the same fail-closed capacity guard as the
/// join-request approval path; a rejected add comes back as a 400 rather
/// than an exception.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        team::{Team, TeamMember},
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Team with roster and derived capacity values
///
/// The derived values are computed from the live membership set at response
/// time, so they are always consistent with the roster below them.
#[derive(Debug, Serialize)]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<TeamMember>,
    pub member_count: i64,
    pub available_slots: i64,
    pub is_full: bool,
}

/// Direct-add payload
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub student_id: Uuid,
}

/// Builds the team detail response from the live roster
pub(crate) async fn build_team_detail(db: &PgPool, team: Team) -> Result<TeamDetail, sqlx::Error> {
    let members = Team::list_members(db, team.id).await?;
    let member_count = members.len() as i64;
    let available_slots = team.available_slots(member_count);
    let is_full = team.is_full(member_count);

    Ok(TeamDetail {
        team,
        members,
        member_count,
        available_slots,
        is_full,
    })
}

/// Loads a team and its project, checking the caller owns the project
async fn load_owned_team(
    state: &AppState,
    team_id: Uuid,
    auth: &AuthContext,
) -> ApiResult<(Team, Project)> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let project = Project::find_by_id(&state.db, team.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can manage team members".to_string(),
        ));
    }

    Ok((team, project))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TeamDetail>> {
    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let detail = build_team_detail(&state.db, team).await?;
    Ok(Json(detail))
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let team = Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let members = Team::list_members(&state.db, team.id).await?;
    Ok(Json(members))
}

/// Add a student to the roster directly (owner only)
///
/// # Errors
///
/// - `400 Bad Request`: team full, already a member, or target is the owner
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<TeamDetail>> {
    let (team, project) = load_owned_team(&state, id, &auth).await?;

    let mut tx = state.db.begin().await?;
    let added = Team::add_member(&mut *tx, &team, req.student_id, project.owner_id).await?;
    tx.commit().await?;

    if !added {
        return Err(ApiError::BadRequest(
            "Could not add member (team may be full or member already exists)".to_string(),
        ));
    }

    let detail = build_team_detail(&state.db, team).await?;
    Ok(Json(detail))
}

/// Remove a student from the roster (owner only)
///
/// # Errors
///
/// - `400 Bad Request`: target is the project owner, or not a member
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let (team, project) = load_owned_team(&state, id, &auth).await?;

    if student_id == project.owner_id {
        return Err(ApiError::BadRequest(
            "Cannot remove project owner from team".to_string(),
        ));
    }

    let removed = Team::remove_member(&state.db, team.id, student_id).await?;
    if !removed {
        return Err(ApiError::BadRequest(
            "Student is not a member of this team".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({
        "message": "Member removed successfully"
    })))
}
