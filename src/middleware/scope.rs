//! Ownership scopes.
//!
//! The one place where "this teacher's own rows only" is derived: each
//! scope extractor resolves the session principal, checks the exact
//! role, and loads the matching profile row. Handlers filter on the
//! profile id from the scope, never on ids taken from client input.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::modules::auth::model::{Principal, UserRole};
use crate::modules::students::model::Student;
use crate::modules::teachers::model::Teacher;
use crate::state::AppState;
use crate::storage::Storage;
use crate::utils::errors::AppError;

/// Authenticated teacher with their profile row.
#[derive(Debug, Clone)]
pub struct TeacherScope {
    pub principal: Principal,
    pub teacher: Teacher,
}

impl FromRequestParts<AppState> for TeacherScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        check_role(&principal, UserRole::Teacher)?;

        let teacher = state
            .storage
            .find_teacher_by_user(principal.id)
            .await?
            .ok_or_else(|| AppError::forbidden("Teacher profile not found"))?;

        Ok(TeacherScope { principal, teacher })
    }
}

/// Authenticated student with their profile row.
#[derive(Debug, Clone)]
pub struct StudentScope {
    pub principal: Principal,
    pub student: Student,
}

impl FromRequestParts<AppState> for StudentScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        check_role(&principal, UserRole::Student)?;

        let student = state
            .storage
            .find_student_by_user(principal.id)
            .await?
            .ok_or_else(|| AppError::forbidden("Student profile not found"))?;

        Ok(StudentScope { principal, student })
    }
}
