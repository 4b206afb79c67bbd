use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::parents::model::{CreateParentDto, ParentDetail};
use crate::modules::parents::service::ParentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/parents",
    responses(
        (status = 200, description = "Parents with users", body = [ParentDetail]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parents(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParentDetail>>, AppError> {
    let parents = ParentService::list_parents(state.storage.as_ref()).await?;
    Ok(Json(parents))
}

#[utoipa::path(
    get,
    path = "/api/admin/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent", body = ParentDetail),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentDetail>, AppError> {
    let parent = ParentService::get_parent(state.storage.as_ref(), id).await?;
    Ok(Json(parent))
}

#[utoipa::path(
    post,
    path = "/api/admin/parents",
    request_body = CreateParentDto,
    responses(
        (status = 201, description = "Parent created", body = ParentDetail),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state, dto))]
pub async fn create_parent(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<(StatusCode, Json<ParentDetail>), AppError> {
    let parent = ParentService::create_parent(state.storage.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(parent)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/parents/{id}",
    params(("id" = Uuid, Path, description = "Parent ID")),
    responses(
        (status = 200, description = "Parent deleted; students are detached"),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn delete_parent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ParentService::delete_parent(state.storage.as_ref(), id).await?;
    Ok(Json(json!({ "success": true })))
}
