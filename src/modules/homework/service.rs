use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::integrity;
use crate::modules::auth::model::PublicUser;
use crate::modules::homework::model::{
    CreateHomeworkDto, CreateSubmissionDto, Homework, HomeworkDetail, HomeworkListItem,
    NewHomework, Submission, SubmissionWithStudent, UpdateHomeworkDto,
};
use crate::storage::{HomeworkFieldUpdate, Storage};
use crate::utils::errors::AppError;

pub struct HomeworkService;

impl HomeworkService {
    /// Ownership check: rows with a different teacher_id read as
    /// absent, so another teacher's homework ids cannot be probed.
    async fn find_owned(
        storage: &dyn Storage,
        teacher_id: Uuid,
        homework_id: Uuid,
    ) -> Result<Homework, AppError> {
        let homework = storage
            .find_homework(homework_id)
            .await?
            .ok_or_else(|| AppError::not_found("Homework not found"))?;
        if homework.teacher_id != teacher_id {
            return Err(AppError::not_found("Homework not found"));
        }
        Ok(homework)
    }

    #[instrument(skip(storage))]
    pub async fn list_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
    ) -> Result<Vec<HomeworkListItem>, AppError> {
        let mut items = Vec::new();
        for homework in storage.list_homework_for_teacher(teacher_id).await? {
            let subject = storage.find_subject(homework.subject_id).await?;
            let submission_count = storage
                .list_submissions_for_homework(homework.id)
                .await?
                .len();
            items.push(HomeworkListItem {
                homework,
                subject,
                submission_count,
            });
        }
        Ok(items)
    }

    #[instrument(skip(storage, dto))]
    pub async fn create_homework(
        storage: &dyn Storage,
        teacher_id: Uuid,
        dto: CreateHomeworkDto,
    ) -> Result<Homework, AppError> {
        let assignment = integrity::resolve_teaching_assignment(
            storage,
            teacher_id,
            dto.subject_id,
            dto.class_id,
        )
        .await?;

        storage
            .create_homework(NewHomework {
                title: dto.title,
                description: dto.description.unwrap_or_default(),
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
        homework_id: Uuid,
    ) -> Result<HomeworkDetail, AppError> {
        let homework = Self::find_owned(storage, teacher_id, homework_id).await?;
        let subject = storage.find_subject(homework.subject_id).await?;

        let mut submissions = Vec::new();
        for submission in storage.list_submissions_for_homework(homework.id).await? {
            let student_user = match storage.find_student(submission.student_id).await? {
                Some(student) => storage
                    .find_user_by_id(student.user_id)
                    .await?
                    .map(PublicUser::from),
                None => None,
            };
            submissions.push(SubmissionWithStudent {
                submission,
                student: student_user,
            });
        }

        Ok(HomeworkDetail {
            homework,
            subject,
            submissions,
        })
    }

    #[instrument(skip(storage, dto))]
    pub async fn update_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        homework_id: Uuid,
        dto: UpdateHomeworkDto,
    ) -> Result<Homework, AppError> {
        Self::find_owned(storage, teacher_id, homework_id).await?;

        storage
            .update_homework(
                homework_id,
                HomeworkFieldUpdate {
                    title: dto.title,
                    description: dto.description,
                    due_date: dto.due_date,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Homework not found"))
    }

    #[instrument(skip(storage))]
    pub async fn delete_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        homework_id: Uuid,
    ) -> Result<(), AppError> {
        Self::find_owned(storage, teacher_id, homework_id).await?;

        if !storage.delete_homework_cascade(homework_id).await? {
            return Err(AppError::not_found("Homework not found"));
        }
        Ok(())
    }

    #[instrument(skip(storage))]
    pub async fn list_homework(storage: &dyn Storage) -> Result<Vec<Homework>, AppError> {
        storage.list_homework().await
    }

    /// One submission per (homework, student); a second attempt is a
    /// conflict, unlike exam attempts which update in place.
    #[instrument(skip(storage, dto))]
    pub async fn submit(
        storage: &dyn Storage,
        student_id: Uuid,
        dto: CreateSubmissionDto,
    ) -> Result<Submission, AppError> {
        storage
            .find_homework(dto.homework_id)
            .await?
            .ok_or_else(|| AppError::not_found("Homework not found"))?;

        storage
            .create_submission(dto.homework_id, student_id, dto.content)
            .await
    }

    #[instrument(skip(storage))]
    pub async fn list_submissions_for_student(
        storage: &dyn Storage,
        student_id: Uuid,
        homework_id: Option<Uuid>,
    ) -> Result<Vec<Submission>, AppError> {
        storage
            .list_submissions_for_student(student_id, homework_id)
            .await
    }
}
