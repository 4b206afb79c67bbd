use tracing::instrument;
use uuid::Uuid;

use crate::modules::classes::model::{Class, CreateClassDto, UpdateClassDto};
use crate::storage::Storage;
use crate::utils::errors::AppError;

pub struct ClassService;

impl ClassService {
    #[instrument(skip(storage))]
    pub async fn list_classes(
        storage: &dyn Storage,
        grade_id: Option<Uuid>,
    ) -> Result<Vec<Class>, AppError> {
        storage.list_classes(grade_id).await
    }

    #[instrument(skip(storage))]
    pub async fn get_class(storage: &dyn Storage, id: Uuid) -> Result<Class, AppError> {
        storage
            .find_class(id)
            .await?
            .ok_or_else(|| AppError::not_found("Class not found"))
    }

    /// The referenced grade must exist before the class row is written,
    /// so an invalid grade can never produce an orphan class.
    #[instrument(skip(storage, dto))]
    pub async fn create_class(
        storage: &dyn Storage,
        dto: CreateClassDto,
    ) -> Result<Class, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("name and grade_id are required"));
        }

        storage
            .find_grade(dto.grade_id)
            .await?
            .ok_or_else(|| AppError::not_found("Grade not found"))?;

        storage.create_class(name, dto.grade_id).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn update_class(
        storage: &dyn Storage,
        id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        if let Some(grade_id) = dto.grade_id {
            storage
                .find_grade(grade_id)
                .await?
                .ok_or_else(|| AppError::not_found("Grade not found"))?;
        }

        let name = dto.name.as_ref().map(|n| n.trim().to_string());
        if name.as_deref() == Some("") {
            return Err(AppError::bad_request("name is required"));
        }

        storage
            .update_class(id, name.as_deref(), dto.grade_id)
            .await?
            .ok_or_else(|| AppError::not_found("Class not found"))
    }

    #[instrument(skip(storage))]
    pub async fn delete_class(storage: &dyn Storage, id: Uuid) -> Result<(), AppError> {
        if !storage.delete_class(id).await? {
            return Err(AppError::not_found("Class not found"));
        }
        Ok(())
    }
}
