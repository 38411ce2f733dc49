/// Integration tests for the ProjectHub API
///
/// These verify the HTTP surface end-to-end against a real database:
/// - registration and login
/// - the join workflow (submit → approve, capacity refusal)
/// - ownership checks on the approval endpoints
/// - the messaging read-state surface
///
/// Tests skip themselves when DATABASE_URL is unset (see tests/common).

mod common;

use axum::http::StatusCode;
use common::{register_student, send_json, try_test_context};

#[tokio::test]
async fn test_health_check() {
    let Some(ctx) = try_test_context().await else {
        return;
    };

    let (status, body) = send_json(&ctx.app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let Some(ctx) = try_test_context().await else {
        return;
    };

    let (status, _) = send_json(&ctx.app, "GET", "/v1/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_and_login() {
    let Some(ctx) = try_test_context().await else {
        return;
    };

    let (_, token) = register_student(&ctx.app, "login-test").await;

    // The token works against an authenticated endpoint
    let (status, body) = send_json(&ctx.app, "GET", "/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["role"], "student");
    assert!(body["student"]["student_number"].is_string());
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let Some(ctx) = try_test_context().await else {
        return;
    };

    let (status, body) = send_json(
        &ctx.app,
        "POST",
        "/v1/auth/register/student",
        None,
        Some(serde_json::json!({
            "email": format!("wrongpw-{}@university.edu", uuid::Uuid::new_v4().simple()),
            "password": "Projecthub1",
            "name": "Wrong PW",
            "student_number": format!("S-{}", uuid::Uuid::new_v4().simple()),
            "department": "Physics",
            "year": "first",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {}", body);

    let email = {
        let (status, me) = send_json(
            &ctx.app,
            "GET",
            "/v1/auth/me",
            Some(body["access_token"].as_str().unwrap()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        me["account"]["email"].as_str().unwrap().to_string()
    };

    let (status, _) = send_json(
        &ctx.app,
        "POST",
        "/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "NotThePassword1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_join_workflow_over_http() {
    let Some(ctx) = try_test_context().await else {
        return;
    };

    let (_, owner_token) = register_student(&ctx.app, "workflow-owner").await;
    let (applicant_id, applicant_token) = register_student(&ctx.app, "workflow-applicant").await;

    // Owner posts a project with a single open slot
    let (status, project) = send_json(
        &ctx.app,
        "POST",
        "/v1/projects",
        Some(&owner_token),
        Some(serde_json::json!({
            "title": "Compiler in Rust",
            "description": "Build a toy compiler",
            "category": "engineering",
            "max_team_size": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "project create failed: {}", project);
    let project_id = project["id"].as_str().unwrap().to_string();

    // Owner cannot join their own project
    let (status, _) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/projects/{}/join", project_id),
        Some(&owner_token),
        Some(serde_json::json!({"message": "it me"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Applicant submits
    let (status, request) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/projects/{}/join", project_id),
        Some(&applicant_token),
        Some(serde_json::json!({"message": "I know Rust"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "join failed: {}", request);
    assert_eq!(request["status"], "pending");
    let request_id = request["id"].as_str().unwrap().to_string();

    // A duplicate submit conflicts
    let (status, _) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/projects/{}/join", project_id),
        Some(&applicant_token),
        Some(serde_json::json!({"message": "again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The applicant cannot approve their own request
    let (status, _) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/join-requests/{}/approve", request_id),
        Some(&applicant_token),
        Some(serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner approves
    let (status, approved) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/join-requests/{}/approve", request_id),
        Some(&owner_token),
        Some(serde_json::json!({"response_message": "welcome"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approve failed: {}", approved);
    assert_eq!(approved["status"], "approved");

    // The roster shows the applicant and the team reads as full
    let (status, team) = send_json(
        &ctx.app,
        "GET",
        &format!("/v1/projects/{}/team", project_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["member_count"], 1);
    assert_eq!(team["is_full"], true);
    assert_eq!(
        team["members"][0]["student_id"].as_str().unwrap(),
        applicant_id
    );

    // A third student bounces off the full team at submission time
    let (_, late_token) = register_student(&ctx.app, "workflow-late").await;
    let (status, body) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/projects/{}/join", project_id),
        Some(&late_token),
        Some(serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "expected team-full: {}", body);
}

#[tokio::test]
async fn test_messaging_over_http() {
    let Some(ctx) = try_test_context().await else {
        return;
    };

    let (_, alice_token) = register_student(&ctx.app, "msg-alice").await;
    let (bob_id, bob_token) = register_student(&ctx.app, "msg-bob").await;

    // Alice opens (creates) the 1:1 thread
    let (status, detail) = send_json(
        &ctx.app,
        "POST",
        "/v1/conversations/find-or-create",
        Some(&alice_token),
        Some(serde_json::json!({"participant_id": bob_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "find-or-create failed: {}", detail);
    let conversation_id = detail["conversation"]["id"].as_str().unwrap().to_string();

    // Repeat call finds the same conversation
    let (status, detail_again) = send_json(
        &ctx.app,
        "POST",
        "/v1/conversations/find-or-create",
        Some(&alice_token),
        Some(serde_json::json!({"participant_id": bob_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        detail_again["conversation"]["id"].as_str().unwrap(),
        conversation_id
    );

    // Alice sends a message; Bob sees one unread in his listing
    let (status, message) = send_json(
        &ctx.app,
        "POST",
        &format!("/v1/conversations/{}/messages", conversation_id),
        Some(&alice_token),
        Some(serde_json::json!({"content": "hi bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "send failed: {}", message);

    let (status, list) = send_json(&ctx.app, "GET", "/v1/conversations", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = list
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["conversation"]["id"].as_str() == Some(conversation_id.as_str()))
        .expect("bob should see the conversation");
    assert_eq!(entry["unread_count"], 1);
    assert_eq!(entry["last_message"]["content"], "hi bob");

    // Bob retrieves the conversation, which marks everything read
    let (status, _) = send_json(
        &ctx.app,
        "GET",
        &format!("/v1/conversations/{}", conversation_id),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = send_json(&ctx.app, "GET", "/v1/conversations", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = list
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["conversation"]["id"].as_str() == Some(conversation_id.as_str()))
        .expect("bob should see the conversation");
    assert_eq!(entry["unread_count"], 0);

    // An outsider cannot read the thread
    let (_, eve_token) = register_student(&ctx.app, "msg-eve").await;
    let (status, _) = send_json(
        &ctx.app,
        "GET",
        &format!("/v1/conversations/{}", conversation_id),
        Some(&eve_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
