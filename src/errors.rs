use crate::utils::logger::{log_error, log_warning};
use actix_web::{HttpResponse, ResponseError};
use charybdis::errors::CharybdisError;
use serde_json::json;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ProdsnapError {
    // 400s
    ValidationError((String, String)),
    NotFound(String),
    Conflict(String),
    UnsupportedMediaType,
    // 400 | 500
    CharybdisError(CharybdisError),
    // 500
    MalformedVersionLabel(String),
    SerdeError(serde_json::Error),
    InternalServerError(String),
    // 503, safe to retry
    CommitFailed(String),
}

impl fmt::Display for ProdsnapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProdsnapError::ValidationError((field, message)) => {
                write!(f, "Validation Error: {}: {}", field, message)
            }
            ProdsnapError::NotFound(e) => write!(f, "Not Found: {}", e),
            ProdsnapError::Conflict(e) => write!(f, "Conflict: {}", e),
            ProdsnapError::UnsupportedMediaType => write!(f, "Unsupported Media Type"),
            ProdsnapError::CharybdisError(e) => write!(f, "Charybdis Error: \n{}", e),
            ProdsnapError::MalformedVersionLabel(label) => {
                write!(f, "Malformed version label in stored data: {:?}", label)
            }
            ProdsnapError::SerdeError(e) => write!(f, "Serde Error: \n{}", e),
            ProdsnapError::InternalServerError(e) => write!(f, "InternalServerError: \n{}", e),
            ProdsnapError::CommitFailed(e) => write!(f, "Commit Failed: {}", e),
        }
    }
}

impl Error for ProdsnapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProdsnapError::CharybdisError(e) => Some(e),
            ProdsnapError::SerdeError(e) => Some(e),
            ProdsnapError::ValidationError(_) => None,
            ProdsnapError::NotFound(_) => None,
            ProdsnapError::Conflict(_) => None,
            ProdsnapError::UnsupportedMediaType => None,
            ProdsnapError::MalformedVersionLabel(_) => None,
            ProdsnapError::InternalServerError(_) => None,
            ProdsnapError::CommitFailed(_) => None,
        }
    }
}

impl ResponseError for ProdsnapError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ProdsnapError::ValidationError((field, message)) => HttpResponse::BadRequest().json(json!({
                "status": 400,
                "message": {field: message}
            })),
            ProdsnapError::NotFound(e) => HttpResponse::NotFound().json(json!({
                "status": 404,
                "message": e
            })),
            ProdsnapError::Conflict(e) => HttpResponse::Conflict().json(json!({
                "status": 409,
                "message": e
            })),
            ProdsnapError::UnsupportedMediaType => HttpResponse::UnsupportedMediaType().json(json!({
                "status": 415,
                "message": "Unsupported Media Type"
            })),
            ProdsnapError::CharybdisError(e) => match e {
                CharybdisError::NotFoundError(e) => HttpResponse::NotFound().json(json!({
                    "status": 404,
                    "message": e.to_string()
                })),
                _ => ProdsnapError::InternalServerError(format!("CharybdisError: {}", e)).error_response(),
            },
            ProdsnapError::CommitFailed(e) => {
                log_warning(format!("commit failed, client may retry: {}", e));

                HttpResponse::ServiceUnavailable().json(json!({
                    "status": 503,
                    "message": "Commit failed, please retry"
                }))
            }
            _ => {
                log_error(self.to_string());

                HttpResponse::InternalServerError().json(json!({
                    "status": 500,
                    "message": self.to_string()
                }))
            }
        }
    }
}

impl From<CharybdisError> for ProdsnapError {
    fn from(e: CharybdisError) -> Self {
        ProdsnapError::CharybdisError(e)
    }
}

impl From<serde_json::Error> for ProdsnapError {
    fn from(e: serde_json::Error) -> Self {
        ProdsnapError::SerdeError(e)
    }
}
