mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use slateboard::storage::Storage;

use common::{
    TestApp, request, seed_admin, seed_student, seed_teacher, test_app, token_for_parts,
    unique_email,
};

/// One teacher assigned to one subject in one class, plus the exam
/// they created for it.
async fn exam_fixture(app: &TestApp) -> (String, Uuid) {
    let admin_token = seed_admin(app).await;

    let (_, grade) = request(
        app,
        "POST",
        "/api/admin/grades",
        Some(&admin_token),
        Some(json!({ "name": "G1" })),
    )
    .await;
    let (_, class) = request(
        app,
        "POST",
        "/api/admin/classes",
        Some(&admin_token),
        Some(json!({ "name": "A", "grade_id": grade["id"].as_str().unwrap() })),
    )
    .await;
    let (_, subject) = request(
        app,
        "POST",
        "/api/admin/subjects",
        Some(&admin_token),
        Some(json!({ "name": "Physics" })),
    )
    .await;

    let teacher_email = unique_email("examiner");
    let (_, teacher) = request(
        app,
        "POST",
        "/api/admin/teachers",
        Some(&admin_token),
        Some(json!({
            "email": teacher_email,
            "password": "password123",
            "subject_id": subject["id"].as_str().unwrap(),
            "class_id": class["id"].as_str().unwrap()
        })),
    )
    .await;
    let teacher_user_id: Uuid = teacher["user"]["id"].as_str().unwrap().parse().unwrap();
    let teacher_token = token_for_parts(app, teacher_user_id, &teacher_email);

    // Single assignment: the class resolves without being supplied.
    let (status, exam) = request(
        app,
        "POST",
        "/api/teacher/exams",
        Some(&teacher_token),
        Some(json!({
            "title": "Midterm",
            "subject_id": subject["id"].as_str().unwrap()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(exam["class_id"], class["id"]);
    assert_eq!(exam["duration_minutes"], 60);

    (teacher_token, exam["id"].as_str().unwrap().parse().unwrap())
}

#[tokio::test]
async fn test_attempt_upserts_instead_of_conflicting() {
    let app = test_app();
    let (_, exam_id) = exam_fixture(&app).await;
    let (student_token, _) = seed_student(&app).await;

    let (status, first) = request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": exam_id, "answers": "draft answers" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["answers"], "draft answers");
    assert_eq!(first["status"], "SUBMITTED");

    // Re-submitting updates in place — the intentional asymmetry with
    // homework submissions, which conflict instead.
    let (status, second) = request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": exam_id, "answers": "final answers" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["answers"], "final answers");
    assert_eq!(second["id"], first["id"]);

    let attempts = app.storage.list_attempts_for_exam(exam_id).await.unwrap();
    assert_eq!(attempts.len(), 1);
}

#[tokio::test]
async fn test_resubmit_without_answers_keeps_previous() {
    let app = test_app();
    let (_, exam_id) = exam_fixture(&app).await;
    let (student_token, _) = seed_student(&app).await;

    request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": exam_id, "answers": "kept answers" })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": exam_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answers"], "kept answers");
}

#[tokio::test]
async fn test_attempt_for_unknown_exam_not_found() {
    let app = test_app();
    let (student_token, _) = seed_student(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exam_detail_includes_own_attempt() {
    let app = test_app();
    let (_, exam_id) = exam_fixture(&app).await;
    let (student_token, _) = seed_student(&app).await;

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/student/exams/{}", exam_id),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["my_attempt"].is_null());

    request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": exam_id, "answers": "answers" })),
    )
    .await;

    let (_, body) = request(
        &app,
        "GET",
        &format!("/api/student/exams/{}", exam_id),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(body["my_attempt"]["answers"], "answers");
}

#[tokio::test]
async fn test_other_teachers_exam_reads_as_absent() {
    let app = test_app();
    let (_, exam_id) = exam_fixture(&app).await;
    let (other_token, _) = seed_teacher(&app).await;

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/teacher/exams/{}", exam_id),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_teacher_exam_listing_counts_attempts() {
    let app = test_app();
    let (teacher_token, exam_id) = exam_fixture(&app).await;
    let (student_token, _) = seed_student(&app).await;

    request(
        &app,
        "POST",
        "/api/student/exams",
        Some(&student_token),
        Some(json!({ "exam_id": exam_id, "answers": "answers" })),
    )
    .await;

    let (status, list) = request(&app, "GET", "/api/teacher/exams", Some(&teacher_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["attempt_count"], 1);
}
