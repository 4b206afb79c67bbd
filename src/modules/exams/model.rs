use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::subjects::model::Subject;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub due_date: DateTime<Utc>,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

/// One attempt per (exam, student); a second submission updates the
/// existing row instead of being rejected.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamAttempt {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub answers: Option<String>,
    pub score: Option<i32>,
    pub status: AttemptStatus,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub subject_id: Uuid,
    /// Required when the acting teacher teaches the subject in more
    /// than one class.
    pub class_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExamDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitAttemptDto {
    pub exam_id: Uuid,
    pub answers: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExam {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub due_date: DateTime<Utc>,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExamListItem {
    #[serde(flatten)]
    pub exam: Exam,
    pub subject: Option<Subject>,
    pub attempt_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExamDetail {
    pub exam: Exam,
    pub subject: Option<Subject>,
    pub my_attempt: Option<ExamAttempt>,
}
