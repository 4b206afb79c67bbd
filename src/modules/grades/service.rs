use tracing::instrument;
use uuid::Uuid;

use crate::modules::grades::model::{CreateGradeDto, Grade, UpdateGradeDto};
use crate::storage::Storage;
use crate::utils::errors::AppError;

pub struct GradeService;

impl GradeService {
    #[instrument(skip(storage))]
    pub async fn list_grades(storage: &dyn Storage) -> Result<Vec<Grade>, AppError> {
        storage.list_grades().await
    }

    #[instrument(skip(storage))]
    pub async fn get_grade(storage: &dyn Storage, id: Uuid) -> Result<Grade, AppError> {
        storage
            .find_grade(id)
            .await?
            .ok_or_else(|| AppError::not_found("Grade not found"))
    }

    #[instrument(skip(storage, dto))]
    pub async fn create_grade(
        storage: &dyn Storage,
        dto: CreateGradeDto,
    ) -> Result<Grade, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        storage.create_grade(name).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn update_grade(
        storage: &dyn Storage,
        id: Uuid,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        storage
            .update_grade(id, name)
            .await?
            .ok_or_else(|| AppError::not_found("Grade not found"))
    }

    #[instrument(skip(storage))]
    pub async fn delete_grade(storage: &dyn Storage, id: Uuid) -> Result<(), AppError> {
        if !storage.delete_grade(id).await? {
            return Err(AppError::not_found("Grade not found"));
        }
        Ok(())
    }
}
