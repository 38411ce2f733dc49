/// Project task endpoints
///
/// # Endpoints
///
/// - `GET  /v1/projects/:id/tasks` - List a project's tasks
/// - `POST /v1/projects/:id/tasks` - Create a task (owner or team member)
/// - `GET  /v1/tasks/:id` - Task detail
/// - `PUT  /v1/tasks/:id` - Update status/assignee/fields (owner or team member)
/// - `DELETE /v1/tasks/:id` - Delete (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        project_task::{
            CreateProjectTask, ProjectTask, TaskPriority, TaskStatus, UpdateProjectTask,
        },
        team::Team,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Task creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub assignee_id: Option<Uuid>,

    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    pub due_date: Option<NaiveDate>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Task list query
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
}

/// Checks that the caller is the owner or a team member of the project
async fn require_project_access(
    state: &AppState,
    project: &Project,
    auth: &AuthContext,
) -> ApiResult<()> {
    if project.owner_id == auth.account_id {
        return Ok(());
    }

    let is_member = match Team::find_by_project(&state.db, project.id).await? {
        Some(team) => Team::is_member(&state.db, team.id, auth.account_id).await?,
        None => false,
    };

    if !is_member {
        return Err(ApiError::Forbidden(
            "Only the project owner or team members can manage tasks".to_string(),
        ));
    }

    Ok(())
}

async fn load_project(state: &AppState, id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<ProjectTask>>> {
    load_project(&state, id).await?;

    let tasks = ProjectTask::list_for_project(&state.db, id, query.status).await?;
    Ok(Json(tasks))
}

/// Create a task under a project (owner or team member)
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<ProjectTask>> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = load_project(&state, id).await?;
    require_project_access(&state, &project, &auth).await?;

    let task = ProjectTask::create(
        &state.db,
        CreateProjectTask {
            project_id: id,
            title: req.title,
            description: req.description,
            assignee_id: req.assignee_id,
            priority: req.priority,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok(Json(task))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectTask>> {
    let task = ProjectTask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update a task (owner or team member)
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateProjectTask>,
) -> ApiResult<Json<ProjectTask>> {
    let task = ProjectTask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = load_project(&state, task.project_id).await?;
    require_project_access(&state, &project, &auth).await?;

    let task = ProjectTask::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task (owner only)
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = ProjectTask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = load_project(&state, task.project_id).await?;
    if project.owner_id != auth.account_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can delete tasks".to_string(),
        ));
    }

    ProjectTask::delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({
        "message": "Task deleted successfully"
    })))
}
