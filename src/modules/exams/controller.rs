use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::scope::{StudentScope, TeacherScope};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::exams::model::{
    CreateExamDto, Exam, ExamAttempt, ExamDetail, ExamListItem, SubmitAttemptDto, UpdateExamDto,
};
use crate::modules::exams::service::ExamService;
use crate::state::AppState;
use crate::storage::Storage;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

// Teacher surface

#[utoipa::path(
    get,
    path = "/api/teacher/exams",
    responses(
        (status = 200, description = "The teacher's exams with attempt counts", body = [ExamListItem]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden or no teacher profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, scope))]
pub async fn get_teacher_exams(
    State(state): State<AppState>,
    scope: TeacherScope,
) -> Result<Json<Vec<ExamListItem>>, AppError> {
    let exams = ExamService::list_for_teacher(state.storage.as_ref(), scope.teacher.id).await?;
    Ok(Json(exams))
}

#[utoipa::path(
    post,
    path = "/api/teacher/exams",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam created", body = Exam),
        (status = 400, description = "Missing field, or class_id needed to disambiguate", body = ErrorResponse),
        (status = 404, description = "Subject not found or not yours", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, scope, dto))]
pub async fn create_exam(
    State(state): State<AppState>,
    scope: TeacherScope,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let exam = ExamService::create_exam(state.storage.as_ref(), scope.teacher.id, dto).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam", body = Exam),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, scope))]
pub async fn get_teacher_exam(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::get_for_teacher(state.storage.as_ref(), scope.teacher.id, id).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    patch,
    path = "/api/teacher/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    request_body = UpdateExamDto,
    responses(
        (status = 200, description = "Exam updated", body = Exam),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, scope, dto))]
pub async fn update_exam(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateExamDto>,
) -> Result<Json<Exam>, AppError> {
    let exam =
        ExamService::update_for_teacher(state.storage.as_ref(), scope.teacher.id, id, dto).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/teacher/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam and its attempts deleted"),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, scope))]
pub async fn delete_exam(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::delete_for_teacher(state.storage.as_ref(), scope.teacher.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

// Student surface

#[utoipa::path(
    get,
    path = "/api/student/exams",
    responses(
        (status = 200, description = "Exam list", body = [Exam]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, _auth))]
pub async fn get_student_exams(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Exam>>, AppError> {
    let exams = ExamService::list_exams(state.storage.as_ref()).await?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/student/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam with the student's own attempt", body = ExamDetail),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, auth))]
pub async fn get_student_exam(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExamDetail>, AppError> {
    // Tolerate a missing student profile here: the exam is readable,
    // my_attempt just stays empty.
    let student = state.storage.find_student_by_user(auth.0.id).await?;
    let detail =
        ExamService::get_exam_detail(state.storage.as_ref(), id, student.map(|s| s.id)).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/api/student/exams",
    request_body = SubmitAttemptDto,
    responses(
        (status = 200, description = "Attempt created or updated in place", body = ExamAttempt),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, scope, dto))]
pub async fn submit_attempt(
    State(state): State<AppState>,
    scope: StudentScope,
    ValidatedJson(dto): ValidatedJson<SubmitAttemptDto>,
) -> Result<Json<ExamAttempt>, AppError> {
    let attempt =
        ExamService::submit_attempt(state.storage.as_ref(), scope.student.id, dto).await?;
    Ok(Json(attempt))
}
