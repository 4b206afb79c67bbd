mod common;

use axum::http::StatusCode;

use slateboard::storage::Storage;

use common::{request, seed_admin, seed_student, seed_teacher, test_app};

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app();

    for uri in [
        "/api/admin/grades",
        "/api/teacher/homework",
        "/api/student/exams",
    ] {
        let (status, _) = request(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expected 401 for {}", uri);
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = test_app();

    let (status, _) = request(
        &app,
        "GET",
        "/api/admin/grades",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_is_not_implicitly_a_teacher() {
    let app = test_app();
    let admin_token = seed_admin(&app).await;

    // Exact-match roles: an admin hitting teacher- or student-gated
    // routes is forbidden, not allowed through a hierarchy.
    let (status, _) = request(
        &app,
        "GET",
        "/api/teacher/homework",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(&app, "GET", "/api/student/exams", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_teacher_cannot_reach_admin_routes() {
    let app = test_app();
    let (teacher_token, _) = seed_teacher(&app).await;

    let (status, _) = request(
        &app,
        "GET",
        "/api/admin/students",
        Some(&teacher_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_cannot_reach_teacher_routes() {
    let app = test_app();
    let (student_token, _) = seed_student(&app).await;

    let (status, _) = request(
        &app,
        "GET",
        "/api/teacher/lessons",
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_unauthorized() {
    let app = test_app();
    let (student_token, student_id) = seed_student(&app).await;

    let (status, _) = request(
        &app,
        "GET",
        "/api/student/homework",
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The principal is re-read from storage per request, so a still
    // valid token whose user is gone stops working immediately.
    app.storage.delete_student_cascade(student_id).await.unwrap();

    let (status, _) = request(
        &app,
        "GET",
        "/api/student/homework",
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
