use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::auth::model::Principal;
use crate::state::AppState;
use crate::storage::Storage;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that resolves the bearer credential into an authenticated
/// [`Principal`].
///
/// The token only proves identity. Role, name and email are re-read
/// from storage on every request so that a role change after the token
/// was issued always wins over the stale payload; a token whose user
/// has been deleted resolves to 401 rather than a ghost principal.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthenticated("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthenticated("Invalid user ID in token"))?;

        let user = state
            .storage
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Unauthorized"))?;

        Ok(AuthUser(Principal::from(user)))
    }
}
