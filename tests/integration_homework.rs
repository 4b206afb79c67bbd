mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use slateboard::storage::Storage;

use common::{
    TestApp, request, seed_admin, seed_student, seed_teacher, test_app, token_for_parts,
    unique_email,
};

struct Fixture {
    admin_token: String,
    teacher_token: String,
    subject_id: Uuid,
    class_a: Uuid,
    class_b: Uuid,
}

/// Admin provisions a subject, one grade with two classes, and a
/// teacher assigned to the subject in both classes — the ambiguous
/// setup from the teacher's point of view.
async fn fixture(app: &TestApp) -> Fixture {
    let admin_token = seed_admin(app).await;

    let (_, grade) = request(
        app,
        "POST",
        "/api/admin/grades",
        Some(&admin_token),
        Some(json!({ "name": "G1" })),
    )
    .await;
    let grade_id: Uuid = grade["id"].as_str().unwrap().parse().unwrap();

    let (_, class_a) = request(
        app,
        "POST",
        "/api/admin/classes",
        Some(&admin_token),
        Some(json!({ "name": "A", "grade_id": grade_id })),
    )
    .await;
    let class_a: Uuid = class_a["id"].as_str().unwrap().parse().unwrap();

    let (_, class_b) = request(
        app,
        "POST",
        "/api/admin/classes",
        Some(&admin_token),
        Some(json!({ "name": "B", "grade_id": grade_id })),
    )
    .await;
    let class_b: Uuid = class_b["id"].as_str().unwrap().parse().unwrap();

    let (_, subject) = request(
        app,
        "POST",
        "/api/admin/subjects",
        Some(&admin_token),
        Some(json!({ "name": "Math" })),
    )
    .await;
    let subject_id: Uuid = subject["id"].as_str().unwrap().parse().unwrap();

    let teacher_email = unique_email("teacher");
    let (status, teacher) = request(
        app,
        "POST",
        "/api/admin/teachers",
        Some(&admin_token),
        Some(json!({
            "email": teacher_email,
            "password": "password123",
            "subject_id": subject_id,
            "class_id": class_a
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let teacher_id = teacher["id"].as_str().unwrap().to_string();
    let teacher_user_id: Uuid = teacher["user"]["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = request(
        app,
        "PATCH",
        &format!("/api/admin/teachers/{}", teacher_id),
        Some(&admin_token),
        Some(json!({
            "assignments": [
                { "subject_id": subject_id, "class_id": class_a },
                { "subject_id": subject_id, "class_id": class_b }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    Fixture {
        admin_token,
        teacher_token: token_for_parts(app, teacher_user_id, &teacher_email),
        subject_id,
        class_a,
        class_b,
    }
}

#[tokio::test]
async fn test_homework_without_class_is_ambiguous_with_class_resolves() {
    let app = test_app();
    let fx = fixture(&app).await;

    // Two classes for the subject, no class given: rejected rather
    // than guessed.
    let (status, body) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({ "title": "Fractions", "subject_id": fx.subject_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("class_id"));

    let (status, body) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({
            "title": "Fractions",
            "subject_id": fx.subject_id,
            "class_id": fx.class_a
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["class_id"], fx.class_a.to_string());
}

#[tokio::test]
async fn test_single_assignment_resolves_class_automatically() {
    let app = test_app();
    let fx = fixture(&app).await;

    // Narrow the teacher back to one class for the subject.
    let (_, teachers) = request(
        &app,
        "GET",
        "/api/admin/teachers",
        Some(&fx.admin_token),
        None,
    )
    .await;
    let teacher_id = teachers[0]["id"].as_str().unwrap().to_string();
    request(
        &app,
        "PATCH",
        &format!("/api/admin/teachers/{}", teacher_id),
        Some(&fx.admin_token),
        Some(json!({
            "assignments": [{ "subject_id": fx.subject_id, "class_id": fx.class_b }]
        })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({ "title": "Decimals", "subject_id": fx.subject_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["class_id"], fx.class_b.to_string());
}

#[tokio::test]
async fn test_unassigned_subject_is_not_yours() {
    let app = test_app();
    let fx = fixture(&app).await;

    let (_, other_subject) = request(
        &app,
        "POST",
        "/api/admin/subjects",
        Some(&fx.admin_token),
        Some(json!({ "name": "History" })),
    )
    .await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({
            "title": "Essay",
            "subject_id": other_subject["id"].as_str().unwrap()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_submission_conflicts_and_keeps_one_row() {
    let app = test_app();
    let fx = fixture(&app).await;
    let (student_token, _) = seed_student(&app).await;

    let (_, homework) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({
            "title": "Fractions",
            "subject_id": fx.subject_id,
            "class_id": fx.class_a
        })),
    )
    .await;
    let homework_id: Uuid = homework["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        "/api/student/homework",
        Some(&student_token),
        Some(json!({ "homework_id": homework_id, "content": "my answers" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        &app,
        "POST",
        "/api/student/homework",
        Some(&student_token),
        Some(json!({ "homework_id": homework_id, "content": "second try" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let submissions = app
        .storage
        .list_submissions_for_homework(homework_id)
        .await
        .unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].content, "my answers");
}

#[tokio::test]
async fn test_submission_for_unknown_homework_not_found() {
    let app = test_app();
    let (student_token, _) = seed_student(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/student/homework",
        Some(&student_token),
        Some(json!({ "homework_id": Uuid::new_v4(), "content": "answers" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_teachers_homework_reads_as_absent() {
    let app = test_app();
    let fx = fixture(&app).await;

    let (_, homework) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({
            "title": "Fractions",
            "subject_id": fx.subject_id,
            "class_id": fx.class_a
        })),
    )
    .await;
    let homework_id = homework["id"].as_str().unwrap().to_string();

    // A different teacher probing the id gets 404, not 403.
    let (other_token, _) = seed_teacher(&app).await;
    for method in ["GET", "DELETE"] {
        let (status, _) = request(
            &app,
            method,
            &format!("/api/teacher/homework/{}", homework_id),
            Some(&other_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // Nor does it show up in their listing.
    let (_, list) = request(&app, "GET", "/api/teacher/homework", Some(&other_token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_student_submission_listing_is_own_rows_only() {
    let app = test_app();
    let fx = fixture(&app).await;
    let (student_a, _) = seed_student(&app).await;
    let (student_b, _) = seed_student(&app).await;

    let (_, homework) = request(
        &app,
        "POST",
        "/api/teacher/homework",
        Some(&fx.teacher_token),
        Some(json!({
            "title": "Fractions",
            "subject_id": fx.subject_id,
            "class_id": fx.class_a
        })),
    )
    .await;
    let homework_id = homework["id"].as_str().unwrap().to_string();

    request(
        &app,
        "POST",
        "/api/student/homework",
        Some(&student_a),
        Some(json!({ "homework_id": homework_id, "content": "a's work" })),
    )
    .await;

    let (status, list) = request(
        &app,
        "GET",
        "/api/student/submissions",
        Some(&student_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 0);

    let (_, list) = request(
        &app,
        "GET",
        "/api/student/submissions",
        Some(&student_a),
        None,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}
