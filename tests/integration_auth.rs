mod common;

use axum::http::StatusCode;
use serde_json::json;

use slateboard::storage::Storage;

use common::{request, test_app, unique_email};

#[tokio::test]
async fn test_signup_creates_student_with_profile() {
    let app = test_app();
    let email = unique_email("signup");

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "STUDENT");

    // The role profile is created together with the user.
    let user = app
        .storage
        .find_user_by_email(&email)
        .await
        .unwrap()
        .unwrap();
    let student = app.storage.find_student_by_user(user.id).await.unwrap();
    assert!(student.is_some());
}

#[tokio::test]
async fn test_signup_teacher_role() {
    let app = test_app();
    let email = unique_email("signup-teacher");

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": "password123", "role": "TEACHER" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "TEACHER");

    let user = app
        .storage
        .find_user_by_email(&email)
        .await
        .unwrap()
        .unwrap();
    let teacher = app.storage.find_teacher_by_user(user.id).await.unwrap();
    assert!(teacher.is_some());
}

#[tokio::test]
async fn test_signup_rejects_admin_and_parent_roles() {
    let app = test_app();

    for role in ["ADMIN", "PARENT"] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({
                "email": unique_email("signup-bad-role"),
                "password": "password123",
                "role": role
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let app = test_app();
    let email = unique_email("dup");
    let body = json!({ "email": email, "password": "password123" });

    let (status, _) = request(&app, "POST", "/api/auth/signup", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(&app, "POST", "/api/auth/signup", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_missing_password_is_bad_request() {
    let app = test_app();

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": unique_email("no-pass") })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_round_trip() {
    let app = test_app();
    let email = unique_email("login");

    request(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], email);

    // The token works against a student-gated route.
    let (status, _) = request(&app, "GET", "/api/student/homework", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let app = test_app();
    let email = unique_email("login-bad");

    request(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_same_rejection() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": unique_email("ghost"), "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // Same generic message as a wrong password; no account probing.
    assert_eq!(body["error"], "Invalid email or password");
}
