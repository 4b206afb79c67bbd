use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub subject_id: Uuid,
    pub class_id: Uuid,
    pub order_index: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub content: Option<String>,
    pub subject_id: Uuid,
    /// Required when the acting teacher teaches the subject in more
    /// than one class.
    pub class_id: Option<Uuid>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLessonDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LessonQuery {
    pub subject_id: Option<Uuid>,
}

/// Post-validation insert payload; the class is already resolved from
/// the acting teacher's assignments.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub title: String,
    pub content: String,
    pub subject_id: Uuid,
    pub class_id: Uuid,
    pub order_index: i32,
}
