use crate::database::SharedStore;
use crate::error::AppError;
use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentType, CONTENT_DISPOSITION};
use actix_web::{web, HttpResponse, Result};
use shared_types::{FileListResponse, FileUploadResponse};
use std::fmt::Write;
use tracing::{info, warn};

const ALLOWED_EXTENSION: &str = ".json";

/// Both fields are optional at the extractor level so that a missing part is
/// reported with its own message instead of a generic form error.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub name: Option<Text<String>>,
    pub file: Option<Bytes>,
}

pub async fn upload_file(
    store: web::Data<SharedStore>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> Result<HttpResponse, AppError> {
    let file = form
        .file
        .ok_or_else(|| AppError::invalid_request("File is required"))?;
    let name = form.name.map(Text::into_inner).unwrap_or_default();

    validate_file_name(&name)?;

    let id = store.insert_file(&name, &file.data).await?;
    info!(file_id = id, name = %name, size = file.data.len(), "Stored uploaded file");

    Ok(HttpResponse::Created().json(FileUploadResponse::uploaded(id, name)))
}

pub async fn list_files(store: web::Data<SharedStore>) -> Result<HttpResponse, AppError> {
    let files = store.list_files().await?;
    info!(count = files.len(), "Listed files");
    Ok(HttpResponse::Ok().json(FileListResponse { files }))
}

/// `tail` is everything after `/files/`; only its first segment is the id.
pub async fn download_file(
    store: web::Data<SharedStore>,
    tail: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_file_id(&tail)?;

    let stored = match store.get_file(id).await? {
        Some(stored) => stored,
        None => {
            warn!(file_id = id, "File not found");
            return Err(AppError::not_found("File not found"));
        }
    };

    let disposition = format!(
        "attachment; filename={}",
        quote_filename(base_name(&stored.name))
    );

    info!(file_id = id, size = stored.contents.len(), "Serving file download");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::octet_stream())
        .insert_header((CONTENT_DISPOSITION, disposition))
        .body(stored.contents))
}

fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::invalid_request("Name is required"));
    }
    if !name.to_lowercase().ends_with(ALLOWED_EXTENSION) {
        return Err(AppError::invalid_request("File name must end with .json"));
    }
    Ok(())
}

fn parse_file_id(tail: &str) -> Result<i32, AppError> {
    let segment = tail.split('/').next().unwrap_or_default();
    segment
        .parse::<i32>()
        .map_err(|_| AppError::invalid_request("Invalid file id"))
}

/// Last element of a slash-separated name, ignoring trailing slashes.
fn base_name(name: &str) -> &str {
    if name.is_empty() {
        return ".";
    }
    let trimmed = name.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Double-quoted filename with `\\`, `"` and every control character escaped,
/// so any stored name yields a valid header value.
fn quote_filename(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if (c as u32) < 0x80 && c.is_control() => {
                let _ = write!(quoted, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", c as u32);
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
