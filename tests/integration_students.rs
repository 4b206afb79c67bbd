mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use slateboard::storage::Storage;

use common::{TestApp, request, seed_admin, test_app, unique_email};

async fn create_grade(app: &TestApp, token: &str, name: &str) -> Uuid {
    let (status, body) = request(
        app,
        "POST",
        "/api/admin/grades",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn create_class(app: &TestApp, token: &str, name: &str, grade_id: Uuid) -> Uuid {
    let (status, body) = request(
        app,
        "POST",
        "/api/admin/classes",
        Some(token),
        Some(json!({ "name": name, "grade_id": grade_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_grade_class_student_chain_persists() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let grade_id = create_grade(&app, &token, "G1").await;
    let class_id = create_class(&app, &token, "C1", grade_id).await;

    let email = unique_email("student-a");
    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(json!({
            "email": email,
            "password": "password123",
            "grade_id": grade_id,
            "class_id": class_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["grade"]["id"], grade_id.to_string());
    assert_eq!(body["class"]["id"], class_id.to_string());
    assert_eq!(body["user"]["email"], email);
}

#[tokio::test]
async fn test_student_rejected_when_class_in_other_grade() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let g1 = create_grade(&app, &token, "G1").await;
    let g2 = create_grade(&app, &token, "G2").await;
    let c2 = create_class(&app, &token, "C2", g2).await;

    let email = unique_email("student-b");
    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(json!({
            "email": email,
            "password": "password123",
            "grade_id": g1,
            "class_id": c2
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    // No partial write: neither the user nor the student row exists.
    assert!(
        app.storage
            .find_user_by_email(&email)
            .await
            .unwrap()
            .is_none()
    );
    let (_, list) = request(&app, "GET", "/api/admin/students", Some(&token), None).await;
    assert_eq!(list, Value::Array(vec![]));
}

#[tokio::test]
async fn test_class_creation_requires_existing_grade() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/classes",
        Some(&token),
        Some(json!({ "name": "Orphan", "grade_id": Uuid::new_v4() })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = request(&app, "GET", "/api/admin/classes", Some(&token), None).await;
    assert_eq!(list, Value::Array(vec![]));
}

#[tokio::test]
async fn test_student_unknown_parent_rejected() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let grade_id = create_grade(&app, &token, "G1").await;
    let class_id = create_class(&app, &token, "C1", grade_id).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(json!({
            "email": unique_email("student-p"),
            "password": "password123",
            "grade_id": grade_id,
            "class_id": class_id,
            "parent_id": Uuid::new_v4()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_duplicate_email_conflicts() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let grade_id = create_grade(&app, &token, "G1").await;
    let class_id = create_class(&app, &token, "C1", grade_id).await;

    let email = unique_email("student-dup");
    let body = json!({
        "email": email,
        "password": "password123",
        "grade_id": grade_id,
        "class_id": class_id
    });

    let (status, _) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(&app, "POST", "/api/admin/students", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_student_update_checks_class_against_target_grade() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let g1 = create_grade(&app, &token, "G1").await;
    let c1 = create_class(&app, &token, "C1", g1).await;
    let g2 = create_grade(&app, &token, "G2").await;
    let c2 = create_class(&app, &token, "C2", g2).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(json!({
            "email": unique_email("student-u"),
            "password": "password123",
            "grade_id": g1,
            "class_id": c1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = body["id"].as_str().unwrap().to_string();

    // Moving to a class of another grade without moving the grade is a
    // mismatch.
    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/api/admin/students/{}", student_id),
        Some(&token),
        Some(json!({ "class_id": c2 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Moving grade and class together is fine.
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/admin/students/{}", student_id),
        Some(&token),
        Some(json!({ "grade_id": g2, "class_id": c2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"]["id"], g2.to_string());
    assert_eq!(body["class"]["id"], c2.to_string());
}

#[tokio::test]
async fn test_student_parent_attach_and_detach() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let grade_id = create_grade(&app, &token, "G1").await;
    let class_id = create_class(&app, &token, "C1", grade_id).await;

    let (status, parent) = request(
        &app,
        "POST",
        "/api/admin/parents",
        Some(&token),
        Some(json!({ "email": unique_email("parent"), "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let parent_id = parent["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(json!({
            "email": unique_email("student-parent"),
            "password": "password123",
            "grade_id": grade_id,
            "class_id": class_id,
            "parent_id": parent_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["parent"]["id"], parent_id);
    let student_id = body["id"].as_str().unwrap().to_string();

    // Explicit null detaches the parent.
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/admin/students/{}", student_id),
        Some(&token),
        Some(json!({ "parent_id": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["parent"].is_null());
}

#[tokio::test]
async fn test_delete_student_removes_user() {
    let app = test_app();
    let token = seed_admin(&app).await;

    let grade_id = create_grade(&app, &token, "G1").await;
    let class_id = create_class(&app, &token, "C1", grade_id).await;

    let email = unique_email("student-del");
    let (_, body) = request(
        &app,
        "POST",
        "/api/admin/students",
        Some(&token),
        Some(json!({
            "email": email,
            "password": "password123",
            "grade_id": grade_id,
            "class_id": class_id
        })),
    )
    .await;
    let student_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/admin/students/{}", student_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(
        app.storage
            .find_user_by_email(&email)
            .await
            .unwrap()
            .is_none()
    );
}
