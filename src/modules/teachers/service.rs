use tracing::instrument;
use uuid::Uuid;

use crate::integrity;
use crate::modules::auth::model::{PublicUser, UserRole};
use crate::modules::teachers::model::{
    AssignmentDetail, AssignmentInput, CreateTeacherDto, Teacher, TeacherDetail, UpdateTeacherDto,
};
use crate::storage::{NewProfile, NewUser, Storage, UserFieldUpdate};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

pub struct TeacherService;

impl TeacherService {
    async fn to_detail(storage: &dyn Storage, teacher: Teacher) -> Result<TeacherDetail, AppError> {
        let user = storage
            .find_user_by_id(teacher.user_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("teacher {} has no user row", teacher.id))
            })?;

        let mut assignments = Vec::new();
        for assignment in storage.list_assignments_for_teacher(teacher.id).await? {
            let subject = storage.find_subject(assignment.subject_id).await?;
            let class = storage.find_class(assignment.class_id).await?;
            if let (Some(subject), Some(class)) = (subject, class) {
                assignments.push(AssignmentDetail {
                    id: assignment.id,
                    subject,
                    class,
                });
            }
        }

        Ok(TeacherDetail {
            id: teacher.id,
            user: PublicUser::from(user),
            assignments,
        })
    }

    #[instrument(skip(storage))]
    pub async fn list_teachers(storage: &dyn Storage) -> Result<Vec<TeacherDetail>, AppError> {
        let mut details = Vec::new();
        for teacher in storage.list_teachers().await? {
            details.push(Self::to_detail(storage, teacher).await?);
        }
        Ok(details)
    }

    #[instrument(skip(storage))]
    pub async fn get_teacher(storage: &dyn Storage, id: Uuid) -> Result<TeacherDetail, AppError> {
        let teacher = storage
            .find_teacher(id)
            .await?
            .ok_or_else(|| AppError::not_found("Teacher not found"))?;
        Self::to_detail(storage, teacher).await
    }

    async fn check_assignment_refs(
        storage: &dyn Storage,
        assignments: &[AssignmentInput],
    ) -> Result<(), AppError> {
        for assignment in assignments {
            storage
                .find_subject(assignment.subject_id)
                .await?
                .ok_or_else(|| AppError::not_found("Subject not found"))?;
            storage
                .find_class(assignment.class_id)
                .await?
                .ok_or_else(|| AppError::not_found("Class not found"))?;
        }
        Ok(())
    }

    /// User, teacher profile and the initial assignment are written in
    /// one transaction; a failed reference check writes nothing.
    #[instrument(skip(storage, dto))]
    pub async fn create_teacher(
        storage: &dyn Storage,
        dto: CreateTeacherDto,
    ) -> Result<TeacherDetail, AppError> {
        integrity::email_unique(storage, &dto.email).await?;

        let assignments = vec![AssignmentInput {
            subject_id: dto.subject_id,
            class_id: dto.class_id,
        }];
        Self::check_assignment_refs(storage, &assignments).await?;

        let (_, profile) = storage
            .create_user_with_profile(
                NewUser {
                    name: dto.name,
                    email: dto.email,
                    password_hash: hash_password(&dto.password)?,
                    role: UserRole::Teacher,
                },
                NewProfile::Teacher { assignments },
            )
            .await?;

        let teacher = match profile {
            crate::storage::CreatedProfile::Teacher(teacher) => teacher,
            _ => return Err(AppError::internal(anyhow::anyhow!("unexpected profile kind"))),
        };
        Self::to_detail(storage, teacher).await
    }

    /// User fields and the assignment set (replace-all) update in one
    /// transaction.
    #[instrument(skip(storage, dto))]
    pub async fn update_teacher(
        storage: &dyn Storage,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherDetail, AppError> {
        storage
            .find_teacher(id)
            .await?
            .ok_or_else(|| AppError::not_found("Teacher not found"))?;

        if let Some(assignments) = &dto.assignments {
            Self::check_assignment_refs(storage, assignments).await?;
        }

        let password_hash = match dto.password.as_deref() {
            Some(password) if !password.is_empty() => Some(hash_password(password)?),
            _ => None,
        };

        storage
            .update_teacher(
                id,
                UserFieldUpdate {
                    name: dto.name,
                    email: dto.email,
                    password_hash,
                },
                dto.assignments,
            )
            .await?;

        Self::get_teacher(storage, id).await
    }

    #[instrument(skip(storage))]
    pub async fn delete_teacher(storage: &dyn Storage, id: Uuid) -> Result<(), AppError> {
        if !storage.delete_teacher_cascade(id).await? {
            return Err(AppError::not_found("Teacher not found"));
        }
        Ok(())
    }
}
