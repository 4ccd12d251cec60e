use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roadprism_core::Error;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NoPath => ApiError::NotFound("No path found".to_string()),
            Error::UnknownNode(_) => ApiError::NotFound(err.to_string()),
            Error::MalformedRequest(_) | Error::InvalidNodeIndex => {
                ApiError::BadRequest(err.to_string())
            }
            Error::Cancelled => ApiError::Unavailable(err.to_string()),
            Error::IoError(_) | Error::InvalidData(_) | Error::GeoJsonError(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal(message) => {
                error!("Request failed: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
