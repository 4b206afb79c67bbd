use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::integrity;
use crate::modules::exams::model::{
    CreateExamDto, Exam, ExamAttempt, ExamDetail, ExamListItem, NewExam, SubmitAttemptDto,
    UpdateExamDto,
};
use crate::storage::{ExamFieldUpdate, Storage};
use crate::utils::errors::AppError;

pub struct ExamService;

impl ExamService {
    /// Ownership check mirroring homework: other teachers' exams read
    /// as absent.
    async fn find_owned(
        storage: &dyn Storage,
        teacher_id: Uuid,
        exam_id: Uuid,
    ) -> Result<Exam, AppError> {
        let exam = storage
            .find_exam(exam_id)
            .await?
            .ok_or_else(|| AppError::not_found("Exam not found"))?;
        if exam.teacher_id != teacher_id {
            return Err(AppError::not_found("Exam not found"));
        }
        Ok(exam)
    }

    #[instrument(skip(storage))]
    pub async fn list_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
    ) -> Result<Vec<ExamListItem>, AppError> {
        let mut items = Vec::new();
        for exam in storage.list_exams_for_teacher(teacher_id).await? {
            let subject = storage.find_subject(exam.subject_id).await?;
            let attempt_count = storage.list_attempts_for_exam(exam.id).await?.len();
            items.push(ExamListItem {
                exam,
                subject,
                attempt_count,
            });
        }
        Ok(items)
    }

    #[instrument(skip(storage, dto))]
    pub async fn create_exam(
        storage: &dyn Storage,
        teacher_id: Uuid,
        dto: CreateExamDto,
    ) -> Result<Exam, AppError> {
        let assignment = integrity::resolve_teaching_assignment(
            storage,
            teacher_id,
            dto.subject_id,
            dto.class_id,
        )
        .await?;

        storage
            .create_exam(NewExam {
                title: dto.title,
                description: dto.description,
                duration_minutes: dto.duration_minutes.unwrap_or(60),
                due_date: dto.due_date.unwrap_or_else(Utc::now),
                subject_id: assignment.subject_id,
                teacher_id,
                class_id: assignment.class_id,
            })
            .await
    }

    #[instrument(skip(storage))]
    pub async fn get_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        exam_id: Uuid,
    ) -> Result<Exam, AppError> {
        Self::find_owned(storage, teacher_id, exam_id).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn update_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        exam_id: Uuid,
        dto: UpdateExamDto,
    ) -> Result<Exam, AppError> {
        Self::find_owned(storage, teacher_id, exam_id).await?;

        storage
            .update_exam(
                exam_id,
                ExamFieldUpdate {
                    title: dto.title,
                    description: dto.description,
                    duration_minutes: dto.duration_minutes,
                    due_date: dto.due_date,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Exam not found"))
    }

    #[instrument(skip(storage))]
    pub async fn delete_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        exam_id: Uuid,
    ) -> Result<(), AppError> {
        Self::find_owned(storage, teacher_id, exam_id).await?;

        if !storage.delete_exam_cascade(exam_id).await? {
            return Err(AppError::not_found("Exam not found"));
        }
        Ok(())
    }

    #[instrument(skip(storage))]
    pub async fn list_exams(storage: &dyn Storage) -> Result<Vec<Exam>, AppError> {
        storage.list_exams().await
    }

    /// Exam plus the calling student's own attempt, when there is one.
    #[instrument(skip(storage))]
    pub async fn get_exam_detail(
        storage: &dyn Storage,
        exam_id: Uuid,
        student_id: Option<Uuid>,
    ) -> Result<ExamDetail, AppError> {
        let exam = storage
            .find_exam(exam_id)
            .await?
            .ok_or_else(|| AppError::not_found("Exam not found"))?;
        let subject = storage.find_subject(exam.subject_id).await?;

        let my_attempt = match student_id {
            Some(student_id) => storage.find_attempt(exam_id, student_id).await?,
            None => None,
        };

        Ok(ExamDetail {
            exam,
            subject,
            my_attempt,
        })
    }

    /// Create-or-update: re-submitting replaces the earlier answers
    /// instead of rejecting, and never produces a second row.
    #[instrument(skip(storage, dto))]
    pub async fn submit_attempt(
        storage: &dyn Storage,
        student_id: Uuid,
        dto: SubmitAttemptDto,
    ) -> Result<ExamAttempt, AppError> {
        storage
            .find_exam(dto.exam_id)
            .await?
            .ok_or_else(|| AppError::not_found("Exam not found"))?;

        storage
            .upsert_attempt(dto.exam_id, student_id, dto.answers)
            .await
    }
}
