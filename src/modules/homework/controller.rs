use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::scope::{StudentScope, TeacherScope};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::homework::model::{
    CreateHomeworkDto, CreateSubmissionDto, Homework, HomeworkDetail, HomeworkListItem,
    Submission, SubmissionQuery, UpdateHomeworkDto,
};
use crate::modules::homework::service::HomeworkService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

// Teacher surface

#[utoipa::path(
    get,
    path = "/api/teacher/homework",
    responses(
        (status = 200, description = "The teacher's homework with submission counts", body = [HomeworkListItem]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden or no teacher profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope))]
pub async fn get_teacher_homework(
    State(state): State<AppState>,
    scope: TeacherScope,
) -> Result<Json<Vec<HomeworkListItem>>, AppError> {
    let homework =
        HomeworkService::list_for_teacher(state.storage.as_ref(), scope.teacher.id).await?;
    Ok(Json(homework))
}

#[utoipa::path(
    post,
    path = "/api/teacher/homework",
    request_body = CreateHomeworkDto,
    responses(
        (status = 201, description = "Homework created", body = Homework),
        (status = 400, description = "Missing field, or class_id needed to disambiguate", body = ErrorResponse),
        (status = 404, description = "Subject not found or not yours", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope, dto))]
pub async fn create_homework(
    State(state): State<AppState>,
    scope: TeacherScope,
    ValidatedJson(dto): ValidatedJson<CreateHomeworkDto>,
) -> Result<(StatusCode, Json<Homework>), AppError> {
    let homework =
        HomeworkService::create_homework(state.storage.as_ref(), scope.teacher.id, dto).await?;
    Ok((StatusCode::CREATED, Json(homework)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/homework/{id}",
    params(("id" = Uuid, Path, description = "Homework ID")),
    responses(
        (status = 200, description = "Homework with submissions", body = HomeworkDetail),
        (status = 404, description = "Homework not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope))]
pub async fn get_teacher_homework_by_id(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
) -> Result<Json<HomeworkDetail>, AppError> {
    let homework =
        HomeworkService::get_for_teacher(state.storage.as_ref(), scope.teacher.id, id).await?;
    Ok(Json(homework))
}

#[utoipa::path(
    patch,
    path = "/api/teacher/homework/{id}",
    params(("id" = Uuid, Path, description = "Homework ID")),
    request_body = UpdateHomeworkDto,
    responses(
        (status = 200, description = "Homework updated", body = Homework),
        (status = 404, description = "Homework not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope, dto))]
pub async fn update_homework(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateHomeworkDto>,
) -> Result<Json<Homework>, AppError> {
    let homework =
        HomeworkService::update_for_teacher(state.storage.as_ref(), scope.teacher.id, id, dto)
            .await?;
    Ok(Json(homework))
}

#[utoipa::path(
    delete,
    path = "/api/teacher/homework/{id}",
    params(("id" = Uuid, Path, description = "Homework ID")),
    responses(
        (status = 200, description = "Homework and its submissions deleted"),
        (status = 404, description = "Homework not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope))]
pub async fn delete_homework(
    State(state): State<AppState>,
    scope: TeacherScope,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    HomeworkService::delete_for_teacher(state.storage.as_ref(), scope.teacher.id, id).await?;
    Ok(Json(json!({ "success": true })))
}

// Student surface

#[utoipa::path(
    get,
    path = "/api/student/homework",
    responses(
        (status = 200, description = "Homework list", body = [Homework]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, _auth))]
pub async fn get_student_homework(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Homework>>, AppError> {
    let homework = HomeworkService::list_homework(state.storage.as_ref()).await?;
    Ok(Json(homework))
}

#[utoipa::path(
    post,
    path = "/api/student/homework",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission created", body = Submission),
        (status = 404, description = "Homework not found", body = ErrorResponse),
        (status = 409, description = "Already submitted", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope, dto))]
pub async fn submit_homework(
    State(state): State<AppState>,
    scope: StudentScope,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let submission =
        HomeworkService::submit(state.storage.as_ref(), scope.student.id, dto).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

#[utoipa::path(
    get,
    path = "/api/student/submissions",
    params(SubmissionQuery),
    responses(
        (status = 200, description = "The student's own submissions", body = [Submission]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden or no student profile", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
#[instrument(skip(state, scope))]
pub async fn get_my_submissions(
    State(state): State<AppState>,
    scope: StudentScope,
    Query(query): Query<SubmissionQuery>,
) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = HomeworkService::list_submissions_for_student(
        state.storage.as_ref(),
        scope.student.id,
        query.homework_id,
    )
    .await?;
    Ok(Json(submissions))
}
