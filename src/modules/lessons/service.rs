use tracing::instrument;
use uuid::Uuid;

use crate::integrity;
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, NewLesson, UpdateLessonDto,
};
use crate::storage::{LessonFieldUpdate, Storage};
use crate::utils::errors::AppError;

pub struct LessonService;

impl LessonService {
    /// A teacher can touch a lesson only when one of their assignments
    /// covers its (subject, class) pair. Anything else reads as absent,
    /// so probing another teacher's lesson ids reveals nothing.
    async fn find_owned(
        storage: &dyn Storage,
        teacher_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Lesson, AppError> {
        let lesson = storage
            .find_lesson(lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson not found"))?;

        let covering = storage
            .list_assignments_for_subject(teacher_id, lesson.subject_id, Some(lesson.class_id))
            .await?;
        if covering.is_empty() {
            return Err(AppError::not_found("Lesson not found"));
        }

        Ok(lesson)
    }

    #[instrument(skip(storage))]
    pub async fn list_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<Lesson>, AppError> {
        storage.list_lessons_for_teacher(teacher_id, subject_id).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn create_lesson(
        storage: &dyn Storage,
        teacher_id: Uuid,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let assignment = integrity::resolve_teaching_assignment(
            storage,
            teacher_id,
            dto.subject_id,
            dto.class_id,
        )
        .await?;

        storage
            .create_lesson(NewLesson {
                title: dto.title,
                content: dto.content.unwrap_or_default(),
                subject_id: assignment.subject_id,
                class_id: assignment.class_id,
                order_index: dto.order_index.unwrap_or(0),
            })
            .await
    }

    #[instrument(skip(storage))]
    pub async fn get_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Lesson, AppError> {
        Self::find_owned(storage, teacher_id, lesson_id).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn update_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        lesson_id: Uuid,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        Self::find_owned(storage, teacher_id, lesson_id).await?;

        storage
            .update_lesson(
                lesson_id,
                LessonFieldUpdate {
                    title: dto.title,
                    content: dto.content,
                    order_index: dto.order_index,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Lesson not found"))
    }

    #[instrument(skip(storage))]
    pub async fn delete_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<(), AppError> {
        Self::find_owned(storage, teacher_id, lesson_id).await?;

        if !storage.delete_lesson(lesson_id).await? {
            return Err(AppError::not_found("Lesson not found"));
        }
        Ok(())
    }

    #[instrument(skip(storage))]
    pub async fn list_lessons(
        storage: &dyn Storage,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<Lesson>, AppError> {
        storage.list_lessons(subject_id).await
    }

    #[instrument(skip(storage))]
    pub async fn get_lesson(storage: &dyn Storage, id: Uuid) -> Result<Lesson, AppError> {
        storage
            .find_lesson(id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson not found"))
    }
}
