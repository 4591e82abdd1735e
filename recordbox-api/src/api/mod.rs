pub mod files;
pub mod hello;
pub mod messages;

use crate::error::AppError;

/// Fallback for a known path hit with a method it does not serve.
pub async fn method_not_allowed() -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}
