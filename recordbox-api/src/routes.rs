//! Route table for the recordbox API.
//!
//! Shared by the server binary and the integration tests so both run the
//! same routing and extractor configuration.

use crate::api::{files, hello, messages, method_not_allowed};
use crate::config::LimitsConfig;
use crate::error::AppError;
use actix_multipart::form::text::TextConfig;
use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

/// Registers every `/api/v1` route plus the body extractor limits.
///
/// The store itself is not registered here; callers add it as
/// `web::Data<SharedStore>` app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limits: &LimitsConfig) {
    cfg.app_data(multipart_config(limits))
        .app_data(text_part_config())
        .app_data(json_config())
        .service(
            web::scope("/api/v1")
                .service(
                    web::resource("/hello")
                        .route(web::get().to(hello::hello))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/files")
                        .route(web::get().to(files::list_files))
                        .route(web::post().to(files::upload_file))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/files/{tail:.*}")
                        .route(web::get().to(files::download_file))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/messages")
                        .route(web::get().to(messages::list_messages))
                        .route(web::post().to(messages::create_message))
                        .default_service(web::to(method_not_allowed)),
                ),
        );
}

fn multipart_config(limits: &LimitsConfig) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(limits.max_upload_bytes)
        .memory_limit(limits.max_upload_bytes)
        .error_handler(|err, _req| {
            tracing::warn!(error = %err, "Rejected multipart upload");
            AppError::invalid_request("Could not parse multipart form").into()
        })
}

/// Text parts are accepted whatever content type the client declares for them.
fn text_part_config() -> TextConfig {
    TextConfig::default().validate_content_type(false)
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "Rejected JSON body");
        AppError::invalid_request("Invalid JSON body").into()
    })
}
