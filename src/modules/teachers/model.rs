use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::model::PublicUser;
use crate::modules::classes::model::Class;
use crate::modules::subjects::model::Subject;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Grants a teacher the right to act on a subject within one class.
/// Unique on (teacher_id, subject_id, class_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeachingAssignment {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignmentInput {
    pub subject_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    pub name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Initial assignment for the new teacher.
    pub subject_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
    /// When present, replaces the teacher's assignments wholesale.
    pub assignments: Option<Vec<AssignmentInput>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentDetail {
    pub id: Uuid,
    pub subject: Subject,
    pub class: Class,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherDetail {
    pub id: Uuid,
    pub user: PublicUser,
    pub assignments: Vec<AssignmentDetail>,
}
