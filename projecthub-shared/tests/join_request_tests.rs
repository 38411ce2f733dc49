/// Integration tests for the join-request workflow and team capacity
///
/// These tests verify the workflow invariants end-to-end against Postgres:
/// - team size never exceeds capacity after approvals or direct adds
/// - terminal requests cannot be approved or rejected again
/// - duplicate open requests are refused, re-requests after rejection work
/// - capacity is re-checked at approval time, not assumed from submission
///
/// Run with a database: see tests/common/mod.rs for setup.

mod common;

use common::{create_project, create_student, try_test_pool};
use projecthub_shared::models::{
    join_request::{JoinRequest, JoinRequestError, RequestStatus},
    team::Team,
};

#[tokio::test]
async fn test_submit_creates_pending_request() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (applicant, _) = create_student(&pool, "applicant").await;
    let project = create_project(&pool, owner.id, 3).await;

    let request = JoinRequest::submit(&pool, project.id, applicant.id, "let me in")
        .await
        .expect("submit should succeed");

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.project_id, project.id);
    assert_eq!(request.student_id, applicant.id);
    assert_eq!(request.message, "let me in");
    assert!(request.response_date.is_none());
}

#[tokio::test]
async fn test_submit_own_project_fails() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let project = create_project(&pool, owner.id, 3).await;

    let result = JoinRequest::submit(&pool, project.id, owner.id, "").await;
    assert!(matches!(result, Err(JoinRequestError::SelfJoin)));
}

#[tokio::test]
async fn test_duplicate_submit_fails() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (applicant, _) = create_student(&pool, "applicant").await;
    let project = create_project(&pool, owner.id, 3).await;

    JoinRequest::submit(&pool, project.id, applicant.id, "first")
        .await
        .expect("first submit should succeed");

    let result = JoinRequest::submit(&pool, project.id, applicant.id, "second").await;
    assert!(matches!(result, Err(JoinRequestError::DuplicateRequest)));
}

#[tokio::test]
async fn test_resubmit_after_rejection_succeeds() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (applicant, _) = create_student(&pool, "applicant").await;
    let project = create_project(&pool, owner.id, 3).await;

    let first = JoinRequest::submit(&pool, project.id, applicant.id, "first")
        .await
        .expect("submit should succeed");

    let rejected = JoinRequest::reject(&pool, first.id, Some("not this time"))
        .await
        .expect("reject should succeed");
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert!(rejected.response_date.is_some());
    assert_eq!(rejected.response_message, "not this time");

    // The rejected row is excluded from the uniqueness check
    let second = JoinRequest::submit(&pool, project.id, applicant.id, "second")
        .await
        .expect("re-submit after rejection should succeed");
    assert_eq!(second.status, RequestStatus::Pending);
    assert_ne!(second.id, first.id, "re-request must create a new record");
}

#[tokio::test]
async fn test_approve_adds_member_and_stamps_response() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (applicant, _) = create_student(&pool, "applicant").await;
    let project = create_project(&pool, owner.id, 3).await;

    let request = JoinRequest::submit(&pool, project.id, applicant.id, "")
        .await
        .expect("submit should succeed");

    let approved = JoinRequest::approve(&pool, request.id, Some("welcome"))
        .await
        .expect("approve should succeed");

    assert_eq!(approved.status, RequestStatus::Approved);
    assert!(approved.response_date.is_some());
    assert_eq!(approved.response_message, "welcome");

    let team = Team::find_by_project(&pool, project.id)
        .await
        .expect("query should succeed")
        .expect("team should exist");
    assert!(Team::is_member(&pool, team.id, applicant.id)
        .await
        .expect("query should succeed"));
}

#[tokio::test]
async fn test_approve_terminal_request_fails_and_leaves_row_unchanged() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (applicant, _) = create_student(&pool, "applicant").await;
    let project = create_project(&pool, owner.id, 3).await;

    let request = JoinRequest::submit(&pool, project.id, applicant.id, "")
        .await
        .expect("submit should succeed");

    let rejected = JoinRequest::reject(&pool, request.id, None)
        .await
        .expect("reject should succeed");

    let result = JoinRequest::approve(&pool, request.id, None).await;
    assert!(matches!(
        result,
        Err(JoinRequestError::InvalidState(RequestStatus::Rejected))
    ));

    // Row is untouched by the failed approval
    let reloaded = JoinRequest::find_by_id(&pool, request.id)
        .await
        .expect("query should succeed")
        .expect("request should exist");
    assert_eq!(reloaded.status, RequestStatus::Rejected);
    assert_eq!(reloaded.response_date, rejected.response_date);
}

#[tokio::test]
async fn test_reject_terminal_request_fails() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (applicant, _) = create_student(&pool, "applicant").await;
    let project = create_project(&pool, owner.id, 3).await;

    let request = JoinRequest::submit(&pool, project.id, applicant.id, "")
        .await
        .expect("submit should succeed");

    JoinRequest::approve(&pool, request.id, None)
        .await
        .expect("approve should succeed");

    let result = JoinRequest::reject(&pool, request.id, None).await;
    assert!(matches!(
        result,
        Err(JoinRequestError::InvalidState(RequestStatus::Approved))
    ));
}

#[tokio::test]
async fn test_late_approval_against_filled_team_fails() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    // Capacity 2, one slot already consumed by an approved request
    let (owner, _) = create_student(&pool, "owner").await;
    let (first, _) = create_student(&pool, "first").await;
    let (second, _) = create_student(&pool, "second").await;
    let (third, _) = create_student(&pool, "third").await;
    let project = create_project(&pool, owner.id, 2).await;

    let request_one = JoinRequest::submit(&pool, project.id, first.id, "")
        .await
        .expect("submit should succeed");
    JoinRequest::approve(&pool, request_one.id, None)
        .await
        .expect("first approve should succeed");

    // Two pending requests while one slot remains
    let request_a = JoinRequest::submit(&pool, project.id, second.id, "")
        .await
        .expect("submit should succeed");
    let request_b = JoinRequest::submit(&pool, project.id, third.id, "")
        .await
        .expect("submit should succeed");

    // Approving A takes the last slot
    JoinRequest::approve(&pool, request_a.id, None)
        .await
        .expect("approve A should succeed");

    // Approving B must fail the re-check and leave B pending
    let result = JoinRequest::approve(&pool, request_b.id, None).await;
    assert!(matches!(result, Err(JoinRequestError::TeamFull)));

    let reloaded = JoinRequest::find_by_id(&pool, request_b.id)
        .await
        .expect("query should succeed")
        .expect("request should exist");
    assert_eq!(reloaded.status, RequestStatus::Pending);

    // Capacity invariant holds
    let team = Team::find_by_project(&pool, project.id)
        .await
        .expect("query should succeed")
        .expect("team should exist");
    let mut conn = pool.acquire().await.expect("acquire should succeed");
    let count = Team::member_count(&mut conn, team.id)
        .await
        .expect("count should succeed");
    assert_eq!(count, 2);
    assert!(count <= i64::from(team.max_members));
}

#[tokio::test]
async fn test_add_member_is_idempotent() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (member, _) = create_student(&pool, "member").await;
    let project = create_project(&pool, owner.id, 3).await;

    let team = Team::find_by_project(&pool, project.id)
        .await
        .expect("query should succeed")
        .expect("team should exist");

    let mut conn = pool.acquire().await.expect("acquire should succeed");

    let first = Team::add_member(&mut conn, &team, member.id, owner.id)
        .await
        .expect("add should succeed");
    assert!(first);

    let second = Team::add_member(&mut conn, &team, member.id, owner.id)
        .await
        .expect("add should succeed");
    assert!(!second, "second add of the same member must fail closed");

    let count = Team::member_count(&mut conn, team.id)
        .await
        .expect("count should succeed");
    assert_eq!(count, 1, "double add must not change team size");
}

#[tokio::test]
async fn test_add_member_refuses_owner() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let project = create_project(&pool, owner.id, 3).await;

    let team = Team::find_by_project(&pool, project.id)
        .await
        .expect("query should succeed")
        .expect("team should exist");

    let mut conn = pool.acquire().await.expect("acquire should succeed");
    let added = Team::add_member(&mut conn, &team, owner.id, owner.id)
        .await
        .expect("call should succeed");

    assert!(!added, "the project owner never takes a roster slot");
}

#[tokio::test]
async fn test_remove_member_is_noop_when_absent() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (stranger, _) = create_student(&pool, "stranger").await;
    let project = create_project(&pool, owner.id, 3).await;

    let team = Team::find_by_project(&pool, project.id)
        .await
        .expect("query should succeed")
        .expect("team should exist");

    let removed = Team::remove_member(&pool, team.id, stranger.id)
        .await
        .expect("call should succeed");
    assert!(!removed);
}

#[tokio::test]
async fn test_submit_against_full_team_fails() {
    let Some(pool) = try_test_pool().await else {
        return;
    };

    let (owner, _) = create_student(&pool, "owner").await;
    let (member, _) = create_student(&pool, "member").await;
    let (late, _) = create_student(&pool, "late").await;
    let project = create_project(&pool, owner.id, 1).await;

    let request = JoinRequest::submit(&pool, project.id, member.id, "")
        .await
        .expect("submit should succeed");
    JoinRequest::approve(&pool, request.id, None)
        .await
        .expect("approve should succeed");

    let result = JoinRequest::submit(&pool, project.id, late.id, "").await;
    assert!(matches!(result, Err(JoinRequestError::TeamFull)));
}
