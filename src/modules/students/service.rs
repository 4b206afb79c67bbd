use tracing::instrument;
use uuid::Uuid;

use crate::integrity;
use crate::modules::auth::model::{PublicUser, UserRole};
use crate::modules::parents::model::ParentDetail;
use crate::modules::students::model::{
    CreateStudentDto, Student, StudentDetail, UpdateStudentDto,
};
use crate::storage::{NewProfile, NewUser, Storage, StudentFieldUpdate, UserFieldUpdate};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

pub struct StudentService;

impl StudentService {
    async fn to_detail(storage: &dyn Storage, student: Student) -> Result<StudentDetail, AppError> {
        let user = storage
            .find_user_by_id(student.user_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("student {} has no user row", student.id))
            })?;

        let grade = match student.grade_id {
            Some(id) => storage.find_grade(id).await?,
            None => None,
        };
        let class = match student.class_id {
            Some(id) => storage.find_class(id).await?,
            None => None,
        };
        let parent = match student.parent_id {
            Some(id) => match storage.find_parent(id).await? {
                Some(parent) => {
                    let parent_user = storage.find_user_by_id(parent.user_id).await?;
                    parent_user.map(|u| ParentDetail {
                        id: parent.id,
                        user: PublicUser::from(u),
                    })
                }
                None => None,
            },
            None => None,
        };

        Ok(StudentDetail {
            id: student.id,
            user: PublicUser::from(user),
            grade,
            class,
            parent,
        })
    }

    #[instrument(skip(storage))]
    pub async fn list_students(storage: &dyn Storage) -> Result<Vec<StudentDetail>, AppError> {
        let mut details = Vec::new();
        for student in storage.list_students().await? {
            details.push(Self::to_detail(storage, student).await?);
        }
        Ok(details)
    }

    #[instrument(skip(storage))]
    pub async fn get_student(storage: &dyn Storage, id: Uuid) -> Result<StudentDetail, AppError> {
        let student = storage
            .find_student(id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;
        Self::to_detail(storage, student).await
    }

    /// Every reference is checked before the transactional write: the
    /// grade must exist, the class must belong to it, and a supplied
    /// parent must resolve. A rejection leaves no user row behind.
    #[instrument(skip(storage, dto))]
    pub async fn create_student(
        storage: &dyn Storage,
        dto: CreateStudentDto,
    ) -> Result<StudentDetail, AppError> {
        integrity::email_unique(storage, &dto.email).await?;

        storage
            .find_grade(dto.grade_id)
            .await?
            .ok_or_else(|| AppError::not_found("Grade not found"))?;
        integrity::class_belongs_to_grade(storage, dto.class_id, dto.grade_id).await?;
        let parent_id = integrity::parent_exists(storage, dto.parent_id).await?;

        let (_, profile) = storage
            .create_user_with_profile(
                NewUser {
                    name: dto.name,
                    email: dto.email,
                    password_hash: hash_password(&dto.password)?,
                    role: UserRole::Student,
                },
                NewProfile::Student {
                    grade_id: Some(dto.grade_id),
                    class_id: Some(dto.class_id),
                    parent_id,
                },
            )
            .await?;

        let student = match profile {
            crate::storage::CreatedProfile::Student(student) => student,
            _ => return Err(AppError::internal(anyhow::anyhow!("unexpected profile kind"))),
        };
        Self::to_detail(storage, student).await
    }

    /// The class check runs against the grade the student will end up
    /// in: the one from the body when present, the stored one
    /// otherwise.
    #[instrument(skip(storage, dto))]
    pub async fn update_student(
        storage: &dyn Storage,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<StudentDetail, AppError> {
        let student = storage
            .find_student(id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;

        if let Some(grade_id) = dto.grade_id {
            storage
                .find_grade(grade_id)
                .await?
                .ok_or_else(|| AppError::not_found("Grade not found"))?;
        }

        if let Some(class_id) = dto.class_id {
            let target_grade = dto
                .grade_id
                .or(student.grade_id)
                .ok_or_else(|| {
                    AppError::bad_request("grade_id is required to assign a class")
                })?;
            integrity::class_belongs_to_grade(storage, class_id, target_grade).await?;
        }

        if let Some(Some(parent_id)) = dto.parent_id {
            integrity::parent_exists(storage, Some(parent_id)).await?;
        }

        let password_hash = match dto.password.as_deref() {
            Some(password) if !password.is_empty() => Some(hash_password(password)?),
            _ => None,
        };

        storage
            .update_student(
                id,
                UserFieldUpdate {
                    name: dto.name,
                    email: dto.email,
                    password_hash,
                },
                StudentFieldUpdate {
                    grade_id: dto.grade_id,
                    class_id: dto.class_id,
                    parent_id: dto.parent_id,
                },
            )
            .await?;

        Self::get_student(storage, id).await
    }

    #[instrument(skip(storage))]
    pub async fn delete_student(storage: &dyn Storage, id: Uuid) -> Result<(), AppError> {
        if !storage.delete_student_cascade(id).await? {
            return Err(AppError::not_found("Student not found"));
        }
        Ok(())
    }
}
