use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    /// Reason line sent to the client. Server-side failures never expose the
    /// driver or configuration detail.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Config(_) => "Internal server error".to_string(),
            AppError::NotFound(_) | AppError::InvalidRequest(_) | AppError::MethodNotAllowed => {
                self.to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), reason = %self, "Request rejected");
        }

        HttpResponse::build(status)
            .content_type(ContentType::plaintext())
            .body(self.public_message())
    }
}

pub type AppResult<T> = Result<T, AppError>;
