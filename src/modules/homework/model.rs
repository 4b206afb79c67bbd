use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::model::PublicUser;
use crate::modules::subjects::model::Subject;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Homework {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: Uuid,
    pub homework_id: Uuid,
    pub student_id: Uuid,
    pub content: String,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHomeworkDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub subject_id: Uuid,
    /// Required when the acting teacher teaches the subject in more
    /// than one class.
    pub class_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHomeworkDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionDto {
    pub homework_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SubmissionQuery {
    pub homework_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewHomework {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    pub submission: Submission,
    pub student: Option<PublicUser>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeworkDetail {
    #[serde(flatten)]
    pub homework: Homework,
    pub subject: Option<Subject>,
    pub submissions: Vec<SubmissionWithStudent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeworkListItem {
    #[serde(flatten)]
    pub homework: Homework,
    pub subject: Option<Subject>,
    pub submission_count: usize,
}
