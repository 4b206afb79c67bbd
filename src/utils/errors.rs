use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application error taxonomy. Every validator and service failure maps
/// to exactly one of these kinds; handlers never construct raw status
/// codes themselves.
#[derive(Debug)]
pub enum AppError {
    /// No valid session (missing, invalid or expired credential, or the
    /// credential's subject no longer exists).
    Unauthenticated(String),
    /// Valid session, wrong role for the operation.
    Forbidden(String),
    /// Referenced entity absent. Also covers cross-tenant access, which
    /// must stay indistinguishable from a nonexistent id.
    NotFound(String),
    /// More than one candidate matched and the disambiguating field was
    /// omitted; the caller must supply it.
    Ambiguous(String),
    /// Uniqueness violation (duplicate email, duplicate submission).
    Conflict(String),
    /// Malformed body, missing required field, or a field empty after
    /// trimming.
    BadRequest(String),
    /// Anything else. Logged server-side; the caller gets a generic
    /// message.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::Ambiguous(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Ambiguous(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Ambiguous(msg)
            | Self::Conflict(msg)
            | Self::BadRequest(msg) => msg.clone(),
            Self::Internal(err) => {
                error!(error = %err, "Internal server error");
                "Something went wrong".to_string()
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::unauthenticated("no session").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("wrong role").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::not_found("missing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ambiguous("which class?").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::conflict("duplicate").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::bad_request("bad body").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_hides_cause() {
        let response = AppError::internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
