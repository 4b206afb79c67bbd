use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::grades::model::{CreateGradeDto, Grade, UpdateGradeDto};
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/grades",
    responses(
        (status = 200, description = "List of grades", body = [Grade]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grades(State(state): State<AppState>) -> Result<Json<Vec<Grade>>, AppError> {
    let grades = GradeService::list_grades(state.storage.as_ref()).await?;
    Ok(Json(grades))
}

#[utoipa::path(
    get,
    path = "/api/admin/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade", body = Grade),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::get_grade(state.storage.as_ref(), id).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    post,
    path = "/api/admin/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade created", body = Grade),
        (status = 400, description = "Missing name", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, dto))]
pub async fn create_grade(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let grade = GradeService::create_grade(state.storage.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = Grade),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, dto))]
pub async fn update_grade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::update_grade(state.storage.as_ref(), id, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    delete,
    path = "/api/admin/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted"),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    GradeService::delete_grade(state.storage.as_ref(), id).await?;
    Ok(Json(json!({ "success": true })))
}
