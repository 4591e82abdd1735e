use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const UPLOADED_STATUS: &str = "uploaded";

/// Listing entry for a stored file. The payload itself is only served by the
/// download endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct FileInfo {
    pub id: i32,
    pub name: String,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

/// Newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct FileListResponse {
    pub files: Vec<FileInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct FileUploadResponse {
    pub id: i32,
    pub name: String,
    pub status: String,
}

impl FileUploadResponse {
    pub fn uploaded(id: i32, name: String) -> Self {
        Self {
            id,
            name,
            status: UPLOADED_STATUS.to_string(),
        }
    }
}
