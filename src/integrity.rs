//! Relational-integrity validators.
//!
//! Each check runs before any write and returns a rejection value on
//! failure; handlers translate the rejection straight into a response.
//! They are shared by every module that mutates linked entities, so a
//! rule like "a class must belong to the student's grade" lives in
//! exactly one place.

use uuid::Uuid;

use crate::modules::auth::model::UserRole;
use crate::modules::classes::model::Class;
use crate::modules::teachers::model::TeachingAssignment;
use crate::storage::Storage;
use crate::utils::errors::AppError;

/// The class must exist and belong to the given grade. A class under a
/// different grade is reported as absent, the same as an unknown id.
pub async fn class_belongs_to_grade(
    storage: &dyn Storage,
    class_id: Uuid,
    grade_id: Uuid,
) -> Result<Class, AppError> {
    let class = storage.find_class(class_id).await?;
    match class {
        Some(class) if class.grade_id == grade_id => Ok(class),
        _ => Err(AppError::not_found(
            "Class not found or does not belong to grade",
        )),
    }
}

pub async fn email_unique(storage: &dyn Storage, email: &str) -> Result<(), AppError> {
    if storage.find_user_by_email(email).await?.is_some() {
        return Err(AppError::conflict("Email already exists"));
    }
    Ok(())
}

/// Resolve which assignment a teacher's new lesson/homework/exam falls
/// under.
///
/// Matches the teacher's assignments on subject, narrowed by class when
/// one is given. Zero matches reads as "not yours" (or nonexistent —
/// the caller cannot tell which). More than one match with no class
/// given is rejected instead of picking an arbitrary class: guessing
/// would silently file the work into the wrong class roster.
pub async fn resolve_teaching_assignment(
    storage: &dyn Storage,
    teacher_id: Uuid,
    subject_id: Uuid,
    class_id: Option<Uuid>,
) -> Result<TeachingAssignment, AppError> {
    let mut matches = storage
        .list_assignments_for_subject(teacher_id, subject_id, class_id)
        .await?;

    match matches.len() {
        0 => Err(AppError::not_found("Subject not found or not yours")),
        1 => Ok(matches.remove(0)),
        _ => Err(AppError::ambiguous(
            "class_id is required: you teach this subject in more than one class",
        )),
    }
}

/// An empty parent reference means "no parent"; a present one must
/// resolve.
pub async fn parent_exists(
    storage: &dyn Storage,
    parent_id: Option<Uuid>,
) -> Result<Option<Uuid>, AppError> {
    match parent_id {
        None => Ok(None),
        Some(id) => {
            storage
                .find_parent(id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent not found"))?;
            Ok(Some(id))
        }
    }
}

/// Self-signup may only create student and teacher accounts; admin and
/// parent accounts are provisioned by an admin.
pub fn signup_role_allowed(role: UserRole) -> Result<(), AppError> {
    match role {
        UserRole::Student | UserRole::Teacher => Ok(()),
        UserRole::Admin | UserRole::Parent => Err(AppError::bad_request("Invalid role")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, NewProfile, NewUser};

    fn new_user(email: &str, role: UserRole) -> NewUser {
        NewUser {
            name: None,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    async fn seed_teacher(storage: &MemoryStorage) -> Uuid {
        let (_, profile) = storage
            .create_user_with_profile(
                new_user("teacher@test.com", UserRole::Teacher),
                NewProfile::Teacher {
                    assignments: vec![],
                },
            )
            .await
            .unwrap();
        match profile {
            crate::storage::CreatedProfile::Teacher(teacher) => teacher.id,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_class_belongs_to_grade() {
        let storage = MemoryStorage::new();
        let grade = storage.create_grade("G1").await.unwrap();
        let class = storage.create_class("C1", grade.id).await.unwrap();

        let found = class_belongs_to_grade(&storage, class.id, grade.id)
            .await
            .unwrap();
        assert_eq!(found.id, class.id);
    }

    #[tokio::test]
    async fn test_class_under_other_grade_reads_as_absent() {
        let storage = MemoryStorage::new();
        let g1 = storage.create_grade("G1").await.unwrap();
        let g2 = storage.create_grade("G2").await.unwrap();
        let class = storage.create_class("C2", g2.id).await.unwrap();

        let err = class_belongs_to_grade(&storage, class.id, g1.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_class_rejected() {
        let storage = MemoryStorage::new();
        let grade = storage.create_grade("G1").await.unwrap();

        let err = class_belongs_to_grade(&storage, Uuid::new_v4(), grade.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_email_unique() {
        let storage = MemoryStorage::new();
        storage
            .create_user_with_profile(
                new_user("taken@test.com", UserRole::Student),
                NewProfile::Student {
                    grade_id: None,
                    class_id: None,
                    parent_id: None,
                },
            )
            .await
            .unwrap();

        assert!(email_unique(&storage, "free@test.com").await.is_ok());
        let err = email_unique(&storage, "taken@test.com").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_single_assignment_resolves_without_class() {
        let storage = MemoryStorage::new();
        let teacher_id = seed_teacher(&storage).await;
        let grade = storage.create_grade("G1").await.unwrap();
        let class = storage.create_class("A", grade.id).await.unwrap();
        let subject = storage.create_subject("Math").await.unwrap();
        storage
            .update_teacher(
                teacher_id,
                Default::default(),
                Some(vec![crate::modules::teachers::model::AssignmentInput {
                    subject_id: subject.id,
                    class_id: class.id,
                }]),
            )
            .await
            .unwrap();

        let resolved = resolve_teaching_assignment(&storage, teacher_id, subject.id, None)
            .await
            .unwrap();
        assert_eq!(resolved.class_id, class.id);
    }

    #[tokio::test]
    async fn test_two_assignments_without_class_is_ambiguous() {
        let storage = MemoryStorage::new();
        let teacher_id = seed_teacher(&storage).await;
        let grade = storage.create_grade("G1").await.unwrap();
        let class_a = storage.create_class("A", grade.id).await.unwrap();
        let class_b = storage.create_class("B", grade.id).await.unwrap();
        let subject = storage.create_subject("Math").await.unwrap();
        storage
            .update_teacher(
                teacher_id,
                Default::default(),
                Some(vec![
                    crate::modules::teachers::model::AssignmentInput {
                        subject_id: subject.id,
                        class_id: class_a.id,
                    },
                    crate::modules::teachers::model::AssignmentInput {
                        subject_id: subject.id,
                        class_id: class_b.id,
                    },
                ]),
            )
            .await
            .unwrap();

        let err = resolve_teaching_assignment(&storage, teacher_id, subject.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Ambiguous(_)));

        // Supplying the class disambiguates.
        let resolved =
            resolve_teaching_assignment(&storage, teacher_id, subject.id, Some(class_a.id))
                .await
                .unwrap();
        assert_eq!(resolved.class_id, class_a.id);
    }

    #[tokio::test]
    async fn test_unassigned_subject_reads_as_absent() {
        let storage = MemoryStorage::new();
        let teacher_id = seed_teacher(&storage).await;
        let subject = storage.create_subject("Math").await.unwrap();

        let err = resolve_teaching_assignment(&storage, teacher_id, subject.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_parent_exists() {
        let storage = MemoryStorage::new();
        let (_, profile) = storage
            .create_user_with_profile(
                new_user("parent@test.com", UserRole::Parent),
                NewProfile::Parent,
            )
            .await
            .unwrap();
        let parent_id = match profile {
            crate::storage::CreatedProfile::Parent(parent) => parent.id,
            _ => unreachable!(),
        };

        assert_eq!(parent_exists(&storage, None).await.unwrap(), None);
        assert_eq!(
            parent_exists(&storage, Some(parent_id)).await.unwrap(),
            Some(parent_id)
        );
        let err = parent_exists(&storage, Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_signup_role_allowed() {
        assert!(signup_role_allowed(UserRole::Student).is_ok());
        assert!(signup_role_allowed(UserRole::Teacher).is_ok());
        assert!(signup_role_allowed(UserRole::Admin).is_err());
        assert!(signup_role_allowed(UserRole::Parent).is_err());
    }
}
