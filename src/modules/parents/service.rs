use tracing::instrument;
use uuid::Uuid;

use crate::integrity;
use crate::modules::auth::model::{PublicUser, UserRole};
use crate::modules::parents::model::{CreateParentDto, Parent, ParentDetail};
use crate::storage::{NewProfile, NewUser, Storage};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

pub struct ParentService;

impl ParentService {
    async fn to_detail(storage: &dyn Storage, parent: Parent) -> Result<ParentDetail, AppError> {
        let user = storage
            .find_user_by_id(parent.user_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("parent {} has no user row", parent.id))
            })?;
        Ok(ParentDetail {
            id: parent.id,
            user: PublicUser::from(user),
        })
    }

    #[instrument(skip(storage))]
    pub async fn list_parents(storage: &dyn Storage) -> Result<Vec<ParentDetail>, AppError> {
        let mut details = Vec::new();
        for parent in storage.list_parents().await? {
            details.push(Self::to_detail(storage, parent).await?);
        }
        Ok(details)
    }

    #[instrument(skip(storage))]
    pub async fn get_parent(storage: &dyn Storage, id: Uuid) -> Result<ParentDetail, AppError> {
        let parent = storage
            .find_parent(id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent not found"))?;
        Self::to_detail(storage, parent).await
    }

    #[instrument(skip(storage, dto))]
    pub async fn create_parent(
        storage: &dyn Storage,
        dto: CreateParentDto,
    ) -> Result<ParentDetail, AppError> {
        integrity::email_unique(storage, &dto.email).await?;

        let (_, profile) = storage
            .create_user_with_profile(
                NewUser {
                    name: dto.name,
                    email: dto.email,
                    password_hash: hash_password(&dto.password)?,
                    role: UserRole::Parent,
                },
                NewProfile::Parent,
            )
            .await?;

        let parent = match profile {
            crate::storage::CreatedProfile::Parent(parent) => parent,
            _ => return Err(AppError::internal(anyhow::anyhow!("unexpected profile kind"))),
        };
        Self::to_detail(storage, parent).await
    }

    #[instrument(skip(storage))]
    pub async fn delete_parent(storage: &dyn Storage, id: Uuid) -> Result<(), AppError> {
        if !storage.delete_parent_cascade(id).await? {
            return Err(AppError::not_found("Parent not found"));
        }
        Ok(())
    }
}
