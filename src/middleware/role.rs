//! Role gate.
//!
//! Checks are exact-match against the operation's declared role. There
//! is deliberately no hierarchy: an admin hitting a teacher-gated route
//! gets 403 like anyone else with the wrong role.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{Principal, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn check_role(principal: &Principal, required_role: UserRole) -> Result<(), AppError> {
    if principal.role != required_role {
        return Err(AppError::forbidden("Forbidden"));
    }
    Ok(())
}

pub fn check_any_role(principal: &Principal, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&principal.role) {
        return Err(AppError::forbidden("Forbidden"));
    }
    Ok(())
}

async fn require_role(
    state: AppState,
    req: Request,
    next: Next,
    required_role: UserRole,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = check_role(&auth_user.0, required_role) {
        return err.into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}

/// Route layer for admin-only subtrees.
///
/// ```rust,ignore
/// Router::new()
///     .nest("/grades", init_grades_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_role(state, req, next, UserRole::Admin).await
}

pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_role(state, req, next, UserRole::Teacher).await
}

pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_role(state, req, next, UserRole::Student).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn principal(role: UserRole) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role,
            name: None,
            email: "test@example.com".to_string(),
        }
    }

    #[test]
    fn test_check_role_exact_match() {
        assert!(check_role(&principal(UserRole::Admin), UserRole::Admin).is_ok());
        assert!(check_role(&principal(UserRole::Teacher), UserRole::Teacher).is_ok());
        assert!(check_role(&principal(UserRole::Student), UserRole::Student).is_ok());
        assert!(check_role(&principal(UserRole::Parent), UserRole::Parent).is_ok());
    }

    #[test]
    fn test_no_role_hierarchy() {
        // An admin is not implicitly allowed onto teacher- or
        // student-gated operations.
        assert!(check_role(&principal(UserRole::Admin), UserRole::Teacher).is_err());
        assert!(check_role(&principal(UserRole::Admin), UserRole::Student).is_err());
        assert!(check_role(&principal(UserRole::Teacher), UserRole::Admin).is_err());
        assert!(check_role(&principal(UserRole::Teacher), UserRole::Student).is_err());
    }

    #[test]
    fn test_check_any_role() {
        let allowed = [UserRole::Teacher, UserRole::Student];
        assert!(check_any_role(&principal(UserRole::Teacher), &allowed).is_ok());
        assert!(check_any_role(&principal(UserRole::Student), &allowed).is_ok());
        assert!(check_any_role(&principal(UserRole::Admin), &allowed).is_err());
    }

    #[test]
    fn test_check_any_role_empty_list() {
        assert!(check_any_role(&principal(UserRole::Admin), &[]).is_err());
    }

    #[test]
    fn test_wrong_role_is_forbidden_not_unauthenticated() {
        let err = check_role(&principal(UserRole::Admin), UserRole::Teacher).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
