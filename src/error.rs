use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn log_and_record(&self, ctx: &str) {
        let message = self.to_string();
        match self {
            AppError::Database(err) => {
                error!(error = %message, context = %ctx, db_error = %err, "Database error");
            }
            AppError::Authentication(msg) => {
                warn!(message = %msg, context = %ctx, "Authentication error");
            }
            AppError::Forbidden(msg) => {
                warn!(message = %msg, context = %ctx, "Forbidden");
            }
            AppError::NotFound(msg) => {
                warn!(message = %msg, context = %ctx, "Not found");
            }
            AppError::Conflict(msg) => {
                warn!(message = %msg, context = %ctx, "Conflict");
            }
            AppError::Validation(msg) => {
                warn!(message = %msg, context = %ctx, "Validation error");
            }
            AppError::Internal(msg) => {
                error!(message = %msg, context = %ctx, "Internal server error");
            }
        }
    }

    pub fn status_code(&self) -> Status {
        match self {
            AppError::Database(_) => Status::InternalServerError,
            AppError::Authentication(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Conflict(_) => Status::Conflict,
            AppError::Validation(_) => Status::BadRequest,
            AppError::Internal(_) => Status::InternalServerError,
        }
    }

    /// Body shown to the caller. Store and internal faults are collapsed to
    /// a generic message so details never leak past the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Server Error".to_string(),
            AppError::Authentication(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl<'r> rocket::response::Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'static> {
        self.log_and_record(&format!("Request to {} {}", req.method(), req.uri()));

        let body = ErrorBody {
            message: self.public_message(),
        };

        Custom(self.status_code(), Json(body)).respond_to(req)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("Cryptography error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization error: {}", error))
    }
}

#[catch(404)]
pub fn not_found_api(_req: &rocket::Request) -> Custom<Json<ErrorBody>> {
    Custom(
        Status::NotFound,
        Json(ErrorBody {
            message: "Resource not found".to_string(),
        }),
    )
}

#[catch(422)]
pub fn unprocessable_api(_req: &rocket::Request) -> Custom<Json<ErrorBody>> {
    Custom(
        Status::UnprocessableEntity,
        Json(ErrorBody {
            message: "Validation failed".to_string(),
        }),
    )
}

#[catch(400)]
pub fn bad_request_api(_req: &rocket::Request) -> Custom<Json<ErrorBody>> {
    Custom(
        Status::BadRequest,
        Json(ErrorBody {
            message: "Bad request".to_string(),
        }),
    )
}

#[catch(500)]
pub fn internal_error_api(_req: &rocket::Request) -> Custom<Json<ErrorBody>> {
    Custom(
        Status::InternalServerError,
        Json(ErrorBody {
            message: "Server Error".to_string(),
        }),
    )
}
