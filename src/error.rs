use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{media::UploadError, models::FieldErrors, repository::RepoError};

/// Persistence operations, each with the fixed message clients see on failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
    Info,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Failed to create movie",
            Operation::List => "Failed to fetch movies",
            Operation::Get => "Failed to fetch movie",
            Operation::Update => "Failed to update movie",
            Operation::Delete => "Failed to delete movie",
            Operation::Info => "Database connection failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid movie")]
    Invalid(FieldErrors),
    #[error("Movie not found")]
    NotFound,
    #[error("Failed to upload image")]
    Upload(#[source] UploadError),
    #[error("{}", .op.failure_message())]
    Persistence {
        op: Operation,
        #[source]
        source: RepoError,
    },
}

impl ApiError {
    pub fn persistence(op: Operation) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Persistence { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upload(_) | ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Invalid(fields) => json!({ "error": self.to_string(), "fields": fields }),
            ApiError::Upload(err) => {
                tracing::error!(error = %err, "image upload failed");
                json!({ "error": self.to_string(), "details": err.to_string() })
            },
            ApiError::Persistence { op, source } => {
                tracing::error!(operation = ?op, error = %source, "persistence call failed");
                json!({ "error": self.to_string() })
            },
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
