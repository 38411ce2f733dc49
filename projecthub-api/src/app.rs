/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use projecthub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = projecthub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use projecthub_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── /v1/                          # API v1 (versioned)
/// │   ├── /auth/                    # Registration, login, session
/// │   ├── /students/, /faculty/     # Profile directories
/// │   ├── /projects/                # Project registry + child resources
/// │   ├── /join-requests/           # Approval workflow
/// │   ├── /teams/                   # Rosters
/// │   ├── /milestones/, /tasks/, /meetings/
/// │   ├── /conversations/           # Messaging
/// │   └── /messages/
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth routes (no token yet)
    let auth_public = Router::new()
        .route("/register/student", post(routes::auth::register_student))
        .route("/register/faculty", post(routes::auth::register_faculty))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Session routes (require JWT)
    let auth_private = Router::new()
        .route("/me", get(routes::auth::me))
        .route("/change-password", post(routes::auth::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let student_routes = Router::new()
        .route("/", get(routes::students::list_students))
        .route("/me", put(routes::students::update_own_profile))
        .route("/:id", get(routes::students::get_student));

    let faculty_routes = Router::new()
        .route("/", get(routes::faculty::list_faculty))
        .route("/me", put(routes::faculty::update_own_profile))
        .route("/:id", get(routes::faculty::get_faculty));

    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:id", get(routes::projects::get_project))
        .route("/:id", put(routes::projects::update_project))
        .route("/:id", axum::routing::delete(routes::projects::delete_project))
        .route("/:id/close", post(routes::projects::close_project))
        .route("/:id/join", post(routes::projects::join_project))
        .route("/:id/requests", get(routes::projects::list_project_requests))
        .route("/:id/team", get(routes::projects::get_project_team))
        .route("/:id/progress", get(routes::projects::get_project_progress))
        .route("/:id/milestones", get(routes::projects::list_project_milestones))
        .route("/:id/milestones", post(routes::projects::add_project_milestone))
        .route("/:id/feedback", get(routes::projects::list_project_feedback))
        .route("/:id/feedback", post(routes::projects::add_project_feedback))
        .route("/:id/tasks", get(routes::tasks::list_project_tasks))
        .route("/:id/tasks", post(routes::tasks::create_task))
        .route("/:id/meetings", get(routes::meetings::list_project_meetings))
        .route("/:id/meetings", post(routes::meetings::schedule_meeting));

    let join_request_routes = Router::new()
        .route("/", get(routes::join_requests::list_join_requests))
        .route("/:id", get(routes::join_requests::get_join_request))
        .route("/:id/approve", post(routes::join_requests::approve_join_request))
        .route("/:id/reject", post(routes::join_requests::reject_join_request));

    let team_routes = Router::new()
        .route("/:id", get(routes::teams::get_team))
        .route("/:id/members", get(routes::teams::list_members))
        .route("/:id/members", post(routes::teams::add_member))
        .route(
            "/:id/members/:student_id",
            axum::routing::delete(routes::teams::remove_member),
        );

    let milestone_routes = Router::new()
        .route("/:id/complete", post(routes::milestones::complete_milestone))
        .route("/:id", put(routes::milestones::update_milestone))
        .route("/:id", axum::routing::delete(routes::milestones::delete_milestone));

    let task_routes = Router::new()
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", axum::routing::delete(routes::tasks::delete_task));

    let meeting_routes = Router::new()
        .route("/:id", get(routes::meetings::get_meeting))
        .route("/:id", axum::routing::delete(routes::meetings::cancel_meeting));

    let conversation_routes = Router::new()
        .route("/", get(routes::messaging::list_conversations))
        .route("/", post(routes::messaging::create_conversation))
        .route("/find-or-create", post(routes::messaging::find_or_create_conversation))
        .route("/:id", get(routes::messaging::get_conversation))
        .route("/:id/messages", get(routes::messaging::list_messages))
        .route("/:id/messages", post(routes::messaging::send_message));

    let message_routes = Router::new().route("/:id/read", post(routes::messaging::mark_message_read));

    // Everything except /auth public routes requires a valid access token
    let v1_routes = Router::new()
        .nest(
            "/students",
            student_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/faculty",
            faculty_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/projects",
            project_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/join-requests",
            join_request_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/teams",
            team_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/milestones",
            milestone_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/tasks",
            task_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/meetings",
            meeting_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/conversations",
            conversation_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest(
            "/messages",
            message_routes.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_layer,
            )),
        )
        .nest("/auth", auth_public.merge(auth_private));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the JWT from the Authorization header, then
/// injects an AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(claims.sub, claims.role);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    // Router construction is exercised end-to-end by the integration tests
    // in tests/, which need a database to stand the state up.
}
