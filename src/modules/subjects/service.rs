use tracing::instrument;
use uuid::Uuid;

use crate::modules::subjects::model::{CreateSubjectDto, Subject, UpdateSubjectDto};
use crate::storage::Storage;
use crate::utils::errors::AppError;

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(storage))]
    pub async fn list_subjects(storage: &dyn Storage) -> Result<Vec<Subject>, AppError> {
        storage.list_subjects().await
    }

    /// Distinct subjects the teacher is assigned to, across classes.
    #[instrument(skip(storage))]
    pub async fn list_subjects_for_teacher(
        storage: &dyn Storage,
        teacher_id: Uuid,
    ) -> Result<Vec<Subject>, AppError> {
        storage.list_subjects_for_teacher(teacher_id).await
    }

    #[instrument(skip(storage))]
    pub async fn get_subject(storage: &dyn Storage, id: Uuid) -> Result<Subject, AppError> {
        storage
            .find_subject(id)
            .await?
            .ok_or_else(|| AppError::not_found("Subject not found"))
    }

    #[instrument(skip(storage, dto))]
    pub async fn create_subject(
        storage: &dyn Storage,
        dto: CreateSubjectDto,
    ) -> Result<Subject, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        storage.create_subject(name).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn update_subject(
        storage: &dyn Storage,
        id: Uuid,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        storage
            .update_subject(id, name)
            .await?
            .ok_or_else(|| AppError::not_found("Subject not found"))
    }

    #[instrument(skip(storage))]
    pub async fn delete_subject(storage: &dyn Storage, id: Uuid) -> Result<(), AppError> {
        if !storage.delete_subject(id).await? {
            return Err(AppError::not_found("Subject not found"));
        }
        Ok(())
    }
}
