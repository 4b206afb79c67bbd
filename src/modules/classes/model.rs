use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub grade_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub grade_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: Option<String>,
    pub grade_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClassQuery {
    /// Restrict the listing to classes of one grade.
    pub grade_id: Option<Uuid>,
}
