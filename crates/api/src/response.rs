use askgod_domain::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A wire-visible error: plain-text body with the matching status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Forbidden".to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".to_string(),
        }
    }

    pub fn not_implemented() -> Self {
        Self {
            status: StatusCode::NOT_IMPLEMENTED,
            message: "Not Implemented".to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound => Self::not_found(err.to_string()),
            StoreError::Conflict(_) | StoreError::AlreadySubmitted | StoreError::InvalidInput(_) => {
                Self::bad_request(err.to_string())
            }
            StoreError::Forbidden(message) => Self {
                status: StatusCode::FORBIDDEN,
                message: message.clone(),
            },
            StoreError::AmbiguousTeam | StoreError::EmptyConfig | StoreError::Database(_) => {
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
