use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::model::{CreateStudentDto, StudentDetail, UpdateStudentDto};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/students",
    responses(
        (status = 200, description = "Students with user, grade, class and parent", body = [StudentDetail]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentDetail>>, AppError> {
    let students = StudentService::list_students(state.storage.as_ref()).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = StudentDetail),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentDetail>, AppError> {
    let student = StudentService::get_student(state.storage.as_ref(), id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = StudentDetail),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 404, description = "Grade, class or parent not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<StudentDetail>), AppError> {
    let student = StudentService::create_student(state.storage.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentDetail),
        (status = 404, description = "Student, grade, class or parent not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentDetail>, AppError> {
    let student = StudentService::update_student(state.storage.as_ref(), id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student and dependents deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::delete_student(state.storage.as_ref(), id).await?;
    Ok(Json(json!({ "success": true })))
}
