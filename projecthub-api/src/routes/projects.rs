/// Project registry endpoints
///
/// # Endpoints
///
/// - `POST   /v1/projects` - Post a project (students only; team created alongside)
/// - `GET    /v1/projects` - Browse with filters
/// - `GET    /v1/projects/:id` - Project detail
/// - `PUT    /v1/projects/:id` - Update (owner only)
/// - `DELETE /v1/projects/:id` - Delete (owner only; children cascade)
/// - `POST   /v1/projects/:id/close` - Mark completed (owner only)
/// - `POST   /v1/projects/:id/join` - Submit a join request (students only)
/// - `GET    /v1/projects/:id/requests` - List join requests (owner only)
/// - `GET    /v1/projects/:id/team` - Team with roster and capacity
/// - `GET    /v1/projects/:id/progress` - Milestone progress summary
/// - `GET/POST /v1/projects/:id/milestones` - Milestones (add: owner only)
/// - `GET/POST /v1/projects/:id/feedback` - Feedback (add: faculty only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::{
        feedback::Feedback,
        join_request::{JoinRequest, RequestStatus},
        milestone::{Milestone, MilestoneProgress},
        project::{
            CreateProject, Project, ProjectCategory, ProjectFilter, ProjectStatus, UpdateProject,
        },
        team::Team,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::teams::{build_team_detail, TeamDetail};

/// Project creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub category: ProjectCategory,

    pub supervisor_id: Option<Uuid>,

    #[serde(default)]
    pub required_skills: Vec<String>,

    /// Team capacity; the owner does not consume a slot
    #[validate(range(min = 1, max = 100, message = "Team size must be 1-100"))]
    #[serde(default = "default_max_team_size")]
    pub max_team_size: i32,

    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub expected_duration: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_max_team_size() -> i32 {
    5
}

/// Browse query parameters
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,

    /// Comma-separated skill list
    pub skills: Option<String>,

    /// Substring search over title and description
    pub search: Option<String>,

    /// "true" restricts to projects the caller owns
    #[serde(default)]
    pub my_projects: bool,

    /// "true" restricts to projects the caller supervises
    #[serde(default)]
    pub supervised: bool,
}

/// Join-request submission payload
#[derive(Debug, Deserialize, Default)]
pub struct JoinProjectRequest {
    #[serde(default)]
    pub message: String,
}

/// Request-list query parameters
#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
}

/// Milestone creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct AddMilestoneRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub due_date: NaiveDate,
}

/// Feedback creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct AddFeedbackRequest {
    #[validate(length(min = 1, message = "Comments are required"))]
    pub comments: String,
}

/// Progress response: the project plus its milestone summary
#[derive(Debug, Serialize)]
pub struct ProjectProgressResponse {
    pub project: Project,
    pub progress: MilestoneProgress,
    pub milestones: Vec<Milestone>,
}

/// Loads a project or 404s
async fn load_project(state: &AppState, id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

/// Loads a project and checks the caller owns it
async fn load_owned_project(state: &AppState, id: Uuid, auth: &AuthContext) -> ApiResult<Project> {
    let project = load_project(state, id).await?;

    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can do this".to_string(),
        ));
    }

    Ok(project)
}

/// Post a new project
///
/// The caller becomes the owner; the team is created alongside with the
/// requested capacity.
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !auth.role.is_student() {
        return Err(ApiError::Forbidden(
            "Only students can post projects".to_string(),
        ));
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            title: req.title,
            description: req.description,
            category: req.category,
            owner_id: auth.account_id,
            supervisor_id: req.supervisor_id,
            required_skills: serde_json::json!(req.required_skills),
            max_team_size: req.max_team_size,
            start_date: req.start_date,
            expected_duration: req.expected_duration,
            tags: serde_json::json!(req.tags),
        },
    )
    .await?;

    Ok(Json(project))
}

/// Browse projects
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let filter = ProjectFilter {
        category: query.category,
        status: query.status,
        skills: query
            .skills
            .map(|s| {
                s.split(',')
                    .map(|skill| skill.trim().to_string())
                    .filter(|skill| !skill.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        search: query.search,
        owner_id: query.my_projects.then_some(auth.account_id),
        supervisor_id: query.supervised.then_some(auth.account_id),
    };

    let projects = Project::list(&state.db, &filter).await?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    Ok(Json(load_project(&state, id).await?))
}

/// Update a project (owner only)
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    load_owned_project(&state, id, &auth).await?;

    let project = Project::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project (owner only)
///
/// The team, memberships, milestones, tasks, meetings, feedback, and join
/// requests all cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    load_owned_project(&state, id, &auth).await?;

    Project::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({
        "message": "Project deleted successfully"
    })))
}

/// Mark a project completed (owner only)
pub async fn close_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    load_owned_project(&state, id, &auth).await?;

    let project = Project::close(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Submit a join request for a project
///
/// The workflow rejects self-joins, duplicate open requests, and full teams;
/// see the shared join-request module for the exact rules.
pub async fn join_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<JoinProjectRequest>,
) -> ApiResult<Json<JoinRequest>> {
    if !auth.role.is_student() {
        return Err(ApiError::Forbidden(
            "Only students can join projects".to_string(),
        ));
    }

    let request = JoinRequest::submit(&state.db, id, auth.account_id, &req.message).await?;

    Ok(Json(request))
}

/// List a project's join requests (owner only)
pub async fn list_project_requests(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Query(query): Query<RequestListQuery>,
) -> ApiResult<Json<Vec<JoinRequest>>> {
    load_owned_project(&state, id, &auth).await?;

    let requests = JoinRequest::list_for_project(&state.db, id, query.status).await?;
    Ok(Json(requests))
}

/// Team detail for a project
pub async fn get_project_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TeamDetail>> {
    load_project(&state, id).await?;

    let team = Team::find_by_project(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let detail = build_team_detail(&state.db, team).await?;
    Ok(Json(detail))
}

/// Milestone progress summary
pub async fn get_project_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectProgressResponse>> {
    let project = load_project(&state, id).await?;

    let progress = Milestone::progress_for_project(&state.db, id).await?;
    let milestones = Milestone::list_for_project(&state.db, id).await?;

    Ok(Json(ProjectProgressResponse {
        project,
        progress,
        milestones,
    }))
}

pub async fn list_project_milestones(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Milestone>>> {
    load_project(&state, id).await?;

    let milestones = Milestone::list_for_project(&state.db, id).await?;
    Ok(Json(milestones))
}

/// Add a milestone (owner only)
///
/// # Errors
///
/// - `400 Bad Request`: due date is in the past
pub async fn add_project_milestone(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMilestoneRequest>,
) -> ApiResult<Json<Milestone>> {
    req.validate().map_err(ApiError::from_validation)?;

    load_owned_project(&state, id, &auth).await?;

    if req.due_date < Utc::now().date_naive() {
        return Err(ApiError::BadRequest(
            "Milestone due date must be in the future".to_string(),
        ));
    }

    let milestone = Milestone::create(&state.db, id, &req.description, req.due_date).await?;
    Ok(Json(milestone))
}

pub async fn list_project_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Feedback>>> {
    load_project(&state, id).await?;

    let feedback = Feedback::list_for_project(&state.db, id).await?;
    Ok(Json(feedback))
}

/// Add feedback (faculty only)
pub async fn add_project_feedback(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AddFeedbackRequest>,
) -> ApiResult<Json<Feedback>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !auth.role.is_faculty() {
        return Err(ApiError::Forbidden(
            "Only faculty can provide feedback".to_string(),
        ));
    }

    load_project(&state, id).await?;

    let feedback = Feedback::create(&state.db, id, auth.account_id, &req.comments).await?;
    Ok(Json(feedback))
}
