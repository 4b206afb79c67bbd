use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::model::PublicUser;
use crate::modules::classes::model::Class;
use crate::modules::grades::model::Grade;
use crate::modules::parents::model::ParentDetail;
use crate::utils::serde::double_option;

/// Student profile. Grade and class are unset for self-signup accounts
/// until an admin places the student; when both are set, the class must
/// belong to the grade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub grade_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    pub name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub grade_id: Uuid,
    pub class_id: Uuid,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
    pub grade_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    /// Omitted = unchanged, null = detach the parent.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetail {
    pub id: Uuid,
    pub user: PublicUser,
    pub grade: Option<Grade>,
    pub class: Option<Class>,
    pub parent: Option<ParentDetail>,
}
