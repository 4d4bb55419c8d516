// routes/error.rs
//
// API error taxonomy. Every failure renders the same envelope:
// {message, code, details?} with the status the taxonomy assigns
// (401 auth, 404 missing entity, 409 conflict, 400 validation).

use rocket::http::Status;
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Unauthorized { code: &'static str, message: String },
    #[error("{message}")]
    NotFound { code: &'static str, message: String },
    #[error("{message}")]
    Conflict { code: &'static str, message: String },
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{message}")]
    Validation {
        message: String,
        details: serde_json::Value,
    },
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn unauthorized(code: &'static str, message: &str) -> Self {
        ApiError::Unauthorized {
            code,
            message: message.to_string(),
        }
    }

    pub fn not_found(code: &'static str, message: &str) -> Self {
        ApiError::NotFound {
            code,
            message: message.to_string(),
        }
    }

    pub fn conflict(code: &'static str, message: &str) -> Self {
        ApiError::Conflict {
            code,
            message: message.to_string(),
        }
    }

    pub fn bad_request(code: &'static str, message: &str) -> Self {
        ApiError::BadRequest {
            code,
            message: message.to_string(),
        }
    }

    pub fn validation(details: serde_json::Value) -> Self {
        ApiError::Validation {
            message: "Request validation failed".to_string(),
            details,
        }
    }

    pub fn internal(message: &str) -> Self {
        ApiError::Internal {
            message: message.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let (http_status, code, message, details) = match self {
            ApiError::Unauthorized { code, message } => (Status::Unauthorized, code, message, None),
            ApiError::NotFound { code, message } => (Status::NotFound, code, message, None),
            ApiError::Conflict { code, message } => (Status::Conflict, code, message, None),
            ApiError::BadRequest { code, message } => (Status::BadRequest, code, message, None),
            ApiError::Validation { message, details } => {
                (Status::BadRequest, "VALIDATION_ERROR", message, Some(details))
            }
            ApiError::Internal { message } => {
                (Status::InternalServerError, "INTERNAL_ERROR", message, None)
            }
        };

        status::Custom(
            http_status,
            Json(ErrorBody {
                message,
                code: code.to_string(),
                details,
            }),
        )
        .respond_to(request)
    }
}
