/// Authentication endpoints
///
/// This module provides registration and session endpoints:
///
/// # Endpoints
///
/// - `POST /v1/auth/register/student` - Register a student account + profile
/// - `POST /v1/auth/register/faculty` - Register a faculty account + profile
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
/// - `GET /v1/auth/me` - Current account with its profile
/// - `POST /v1/auth/change-password` - Change the current password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Json};
use projecthub_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{
        account::{Account, AccountRole, CreateAccount},
        faculty::{CreateFaculty, Faculty},
        student::{CreateStudent, Student, StudyYear},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Student registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// University-issued student identifier
    #[validate(length(min = 1, max = 50, message = "Student number must be 1-50 characters"))]
    pub student_number: String,

    /// Department name
    #[validate(length(min = 1, max = 255, message = "Department must be 1-255 characters"))]
    pub department: String,

    /// Study year
    pub year: StudyYear,

    /// Skill list
    #[serde(default)]
    pub skills: Vec<String>,

    /// Interest list
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Faculty registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterFacultyRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// University-issued faculty identifier
    #[validate(length(min = 1, max = 50, message = "Faculty number must be 1-50 characters"))]
    pub faculty_number: String,

    #[validate(length(min = 1, max = 255, message = "Department must be 1-255 characters"))]
    pub department: String,

    /// Academic title
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub specialization: String,

    #[serde(default)]
    pub office_location: String,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Account ID
    pub account_id: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub account_id: String,
    pub role: AccountRole,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Current-account response with the role's profile attached
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<Faculty>,
}

/// Change-password request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

fn validate_request<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(ApiError::from_validation)
}

fn check_password_strength(password: &str) -> ApiResult<()> {
    password::validate_password_strength(password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })
}

fn issue_token_pair(
    state: &AppState,
    account_id: uuid::Uuid,
    role: AccountRole,
) -> ApiResult<(String, String)> {
    let access_claims = jwt::Claims::new(account_id, role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(account_id, role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok((access_token, refresh_token))
}

/// Register a new student
///
/// Creates the account and its student profile. If the profile insert fails
/// (e.g., duplicate student number) the freshly created account is removed
/// again so registration stays all-or-nothing.
///
/// # Errors
///
/// - `409 Conflict`: email or student number already exists
/// - `422 Unprocessable Entity`: validation failed
pub async fn register_student(
    State(state): State<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    validate_request(&req)?;
    check_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;

    let account = Account::create(
        &state.db,
        CreateAccount {
            email: req.email,
            password_hash,
            name: req.name,
            role: AccountRole::Student,
        },
    )
    .await?;

    let profile = Student::create(
        &state.db,
        CreateStudent {
            account_id: account.id,
            student_number: req.student_number,
            department: req.department,
            year: req.year,
            skills: serde_json::json!(req.skills),
            interests: serde_json::json!(req.interests),
        },
    )
    .await;

    if let Err(e) = profile {
        // Roll the account back so a failed registration leaves nothing behind
        let _ = Account::delete(&state.db, account.id).await;
        return Err(e.into());
    }

    let (access_token, refresh_token) = issue_token_pair(&state, account.id, account.role)?;

    Ok(Json(RegisterResponse {
        account_id: account.id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Register a new faculty member
///
/// Same shape as student registration, with the faculty profile fields.
pub async fn register_faculty(
    State(state): State<AppState>,
    Json(req): Json<RegisterFacultyRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    validate_request(&req)?;
    check_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;

    let account = Account::create(
        &state.db,
        CreateAccount {
            email: req.email,
            password_hash,
            name: req.name,
            role: AccountRole::Faculty,
        },
    )
    .await?;

    let profile = Faculty::create(
        &state.db,
        CreateFaculty {
            account_id: account.id,
            faculty_number: req.faculty_number,
            department: req.department,
            title: req.title,
            specialization: req.specialization,
            office_location: req.office_location,
        },
    )
    .await;

    if let Err(e) = profile {
        let _ = Account::delete(&state.db, account.id).await;
        return Err(e.into());
    }

    let (access_token, refresh_token) = issue_token_pair(&state, account.id, account.role)?;

    Ok(Json(RegisterResponse {
        account_id: account.id.to_string(),
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// Authenticates an account and returns a JWT pair.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email, wrong password, or inactive account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validate_request(&req)?;

    let account = Account::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &account.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !account.is_active {
        return Err(ApiError::Unauthorized("Account is deactivated".to_string()));
    }

    Account::update_last_login(&state.db, account.id).await?;

    let (access_token, refresh_token) = issue_token_pair(&state, account.id, account.role)?;

    Ok(Json(LoginResponse {
        account_id: account.id.to_string(),
        role: account.role,
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Current account with its profile
pub async fn me(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<MeResponse>> {
    let account = Account::find_by_id(&state.db, auth.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let (student, faculty) = match account.role {
        AccountRole::Student => (Student::find_by_account(&state.db, account.id).await?, None),
        AccountRole::Faculty => (None, Faculty::find_by_account(&state.db, account.id).await?),
    };

    Ok(Json(MeResponse {
        account,
        student,
        faculty,
    }))
}

/// Change the current account's password
///
/// # Errors
///
/// - `400 Bad Request`: old password is wrong
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    check_password_strength(&req.new_password)?;

    let account = Account::find_by_id(&state.db, auth.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let valid = password::verify_password(&req.old_password, &account.password_hash)?;
    if !valid {
        return Err(ApiError::BadRequest("Wrong password".to_string()));
    }

    let new_hash = password::hash_password(&req.new_password)?;
    Account::update_password(&state.db, account.id, &new_hash).await?;

    Ok(Json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}
