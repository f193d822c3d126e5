use axum::{Json, http::StatusCode, response::IntoResponse};
use validator::ValidationErrors;

use crate::{auth::error::AuthError, db::error::DatabaseError, model::ErrorBody};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error")]
    Database(DatabaseError),

    #[error("Auth error")]
    Auth(AuthError),

    #[error("Validation error")]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("Other error: {0}")]
    Other(anyhow::Error),
}

impl From<DatabaseError> for Error {
    fn from(value: DatabaseError) -> Self {
        Self::Database(value)
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Database(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            Error::Database(DatabaseError::DatabaseError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Auth(AuthError::JwtError(_)) | Error::Auth(AuthError::PasswordError(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let message = match &self {
            Error::Database(DatabaseError::DatabaseError(error)) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Database Error");
                "Internal server error".to_string()
            }
            Error::Auth(AuthError::JwtError(error)) => {
                tracing::error!(err.msg = %error, err.details = ?error, "JWT Error");
                "Internal server error".to_string()
            }
            Error::Auth(AuthError::PasswordError(error)) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Password Hash Error");
                "Internal server error".to_string()
            }
            Error::Other(error) => {
                tracing::error!(err.msg = %error, err.details = ?error, "Other Error");
                "Internal server error".to_string()
            }
            Error::Validation(validation_error) => {
                tracing::warn!(err.msg = %validation_error, "Validation Error");
                validation_error.to_string()
            }
            Error::Auth(auth_error) => auth_error.to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            code: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
