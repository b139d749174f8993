use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;

use crate::users::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    DatabaseError(#[from] DatabaseError),

    #[error(transparent)]
    ValidationError(#[from] ValidationError),

    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    InternalError(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// A missing row is a store failure like any other; callers that want a 404
// match on `DatabaseError::NoRows` themselves.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let response = json!({
            "error": {
                "status": status.as_u16(),
                "message": self.to_string()
            }
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Store failures. The message is the driver's own text so callers see the
/// underlying cause.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("{0}")]
    ConnectionError(String),

    #[error("{0}")]
    QueryError(String),

    #[error("{0}")]
    NoRows(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NoRows(err.to_string()),
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionError(err.to_string())
            }
            _ => DatabaseError::QueryError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::InternalError(_)));

        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::ConfigError(_)));

        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(app_err, AppError::DatabaseError(DatabaseError::NoRows(_))));

        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(app_err, AppError::DatabaseError(DatabaseError::ConnectionError(_))));
    }

    #[test]
    fn test_error_status_codes() {
        let err = AppError::ValidationError(ValidationError::NameEmpty);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::BadRequest("bad id".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::NotFound;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AppError::PayloadTooLarge("form too large".to_string());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        // no rows is still a store failure
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::InternalError("bad id".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ValidationError(ValidationError::AgeOutOfRange);
        assert_eq!(err.to_string(), "age must be between 0 and 200");

        let err = AppError::NotFound;
        assert_eq!(err.to_string(), "Not Found");

        // raw driver text is passed through
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.to_string(), sqlx::Error::RowNotFound.to_string());
    }

    #[actix_web::test]
    async fn test_error_response_envelope() {
        let err = AppError::ValidationError(ValidationError::NameTooLong);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["status"], 400);
        assert_eq!(json["error"]["message"], "name is too long");
    }
}
