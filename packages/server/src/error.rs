use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_common::StorageError;
use catalog_common::storage::ImageDecodeError;
use sea_orm::DbErr;
use serde::Serialize;

pub const MISSING_FIELDS: &str = "missing required fields";
pub const INVALID_IMAGE: &str = "invalid/undecodable image";

/// Error body returned by every endpoint on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "missing required fields")]
    pub error: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// The supplied image payload could not be decoded.
    InvalidImage,
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl AppError {
    pub fn missing_fields() -> Self {
        AppError::Validation(MISSING_FIELDS.into())
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidImage => (StatusCode::BAD_REQUEST, INVALID_IMAGE.into()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".into(),
                )
            }
        };
        (status, ErrorBody { error })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { .. } => AppError::PayloadTooLarge(err.to_string()),
            StorageError::NotFound(_) => AppError::NotFound("file not found".into()),
            StorageError::InvalidPath(_) => AppError::Validation(err.to_string()),
            StorageError::Io(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ImageDecodeError> for AppError {
    fn from(err: ImageDecodeError) -> Self {
        tracing::debug!("Rejected image payload: {err}");
        AppError::InvalidImage
    }
}
