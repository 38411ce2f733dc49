/// Join-request workflow endpoints
///
/// # Endpoints
///
/// - `GET  /v1/join-requests` - Requests the caller sent or received
/// - `GET  /v1/join-requests/:id` - One request (sender or owner only)
/// - `POST /v1/join-requests/:id/approve` - Approve (owner only)
/// - `POST /v1/join-requests/:id/reject` - Reject (owner only)
///
/// Submission happens at `POST /v1/projects/:id/join`. Approve and reject
/// are only valid on pending requests; the shared workflow enforces the
/// state machine and the capacity re-check, and this layer enforces who may
/// call them.

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
    models::{join_request::JoinRequest, project::Project},
};
use serde::Deserialize;
use uuid::Uuid;

/// Approve/reject payload
#[derive(Debug, Deserialize, Default)]
pub struct RespondRequest {
    /// Optional message back to the requesting student
    pub response_message: Option<String>,
}

/// Loads a request and checks the caller owns the target project
async fn load_managed_request(
    state: &AppState,
    id: Uuid,
    auth: &AuthContext,
) -> ApiResult<JoinRequest> {
    let request = JoinRequest::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Join request not found".to_string()))?;

    let project = Project::find_by_id(&state.db, request.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can respond to join requests".to_string(),
        ));
    }

    Ok(request)
}

/// Requests visible to the caller: ones they sent plus ones against their
/// projects
pub async fn list_join_requests(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<JoinRequest>>> {
    let requests = JoinRequest::list_visible_to_student(&state.db, auth.account_id).await?;
    Ok(Json(requests))
}

pub async fn get_join_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JoinRequest>> {
    let request = JoinRequest::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Join request not found".to_string()))?;

    // Visible to the sender and to the project owner, nobody else
    if request.student_id != auth.account_id {
        let project = Project::find_by_id(&state.db, request.project_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

        if project.owner_id != auth.account_id {
            return Err(ApiError::Forbidden(
                "You cannot view this join request".to_string(),
            ));
        }
    }

    Ok(Json(request))
}

/// Approve a pending request (owner only)
///
/// Capacity is re-checked at approval time inside one transaction; if the
/// team filled up since submission this fails with a 400 and the request
/// stays pending.
pub async fn approve_join_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> ApiResult<Json<JoinRequest>> {
    load_managed_request(&state, id, &auth).await?;

    let request = JoinRequest::approve(&state.db, id, req.response_message.as_deref()).await?;

    Ok(Json(request))
}

/// Reject a pending request (owner only)
pub async fn reject_join_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> ApiResult<Json<JoinRequest>> {
    load_managed_request(&state, id, &auth).await?;

    let request = JoinRequest::reject(&state.db, id, req.response_message.as_deref()).await?;

    Ok(Json(request))
}
