use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::scope::TeacherScope;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, LessonQuery, UpdateLessonDto,
};
use crate::modules::lessons::service::LessonService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

// Teacher surface

#[utoipa::path(
    get,
    path = "/api/teacher/lessons",
    params(LessonQuery),
    responses(
        (status = 200, description = "Lessons under the teacher's assignments", body = [Lesson]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden or no teacher profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, scope))]
pub async fn get_teacher_lessons(
    State(state): State<AppState>,
    scope: TeacherScope,
    Query(query): Query<LessonQuery>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons =
        LessonService::list_for_teacher(state.storage.as_ref(), scope.teacher.id, query.subject_id)
            .await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    post,
    path = "/api/teacher/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 400, description = "Missing field, or class_id needed to disambiguate", body = ErrorResponse),
        (status = 404, description = "Subject not found or not yours", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, scope, dto))]
pub async fn create_lesson(
    State(state): State<AppState>,
    scope: TeacherScope,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<(StatusCode, Json<Lesson>), AppError> {
    let lesson =
        LessonService::create_lesson(state.storage.as_ref(), scope.teacher.id, dto).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, scope))]
pub async fn get_teacher_lesson(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    let lesson =
        LessonService::get_for_teacher(state.storage.as_ref(), scope.teacher.id, id).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    patch,
    path = "/api/teacher/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, scope, dto))]
pub async fn update_lesson(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson =
        LessonService::update_for_teacher(state.storage.as_ref(), scope.teacher.id, id, dto)
            .await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/api/teacher/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, scope))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    LessonService::delete_for_teacher(state.storage.as_ref(), scope.teacher.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

// Student surface (read-only)

#[utoipa::path(
    get,
    path = "/api/student/lessons",
    params(LessonQuery),
    responses(
        (status = 200, description = "Lessons", body = [Lesson]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, _auth))]
pub async fn get_student_lessons(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LessonQuery>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons = LessonService::list_lessons(state.storage.as_ref(), query.subject_id).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/student/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, _auth))]
pub async fn get_student_lesson(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::get_lesson(state.storage.as_ref(), id).await?;
    Ok(Json(lesson))
}
