use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::model::PublicUser;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Parent {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParentDto {
    pub name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParentDetail {
    pub id: Uuid,
    pub user: PublicUser,
}
