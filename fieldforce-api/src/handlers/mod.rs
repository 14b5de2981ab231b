pub mod attendance;
pub mod expense_sheets;
pub mod rates;
pub mod route;
pub mod users;

use actix_web::HttpResponse;
use shared_types::{ErrorResponse, WorkflowError};

/// Error returned by every handler. Serialized as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Workflow(WorkflowError),
    Unauthorized(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Workflow(err) => write!(f, "{}", err),
            ApiError::Unauthorized(msg) => write!(f, "{}", msg),
            ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        match self {
            ApiError::Workflow(WorkflowError::Forbidden(_)) => HttpResponse::Forbidden().json(body),
            ApiError::Workflow(WorkflowError::NotFound(_)) => HttpResponse::NotFound().json(body),
            ApiError::Workflow(WorkflowError::InvalidTransition(_))
            | ApiError::Workflow(WorkflowError::InvalidState(_)) => {
                HttpResponse::Conflict().json(body)
            }
            ApiError::Workflow(WorkflowError::InvalidInput(_)) => {
                HttpResponse::BadRequest().json(body)
            }
            ApiError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
