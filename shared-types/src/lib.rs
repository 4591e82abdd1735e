use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod files;
pub mod messages;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use files::{FileInfo, FileListResponse, FileUploadResponse, UPLOADED_STATUS};
pub use messages::{
    CreateMessageRequest, CreateMessageResponse, MessageInfo, MessageListResponse, CREATED_STATUS,
};

// Shared models for the recordbox API and its clients

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct HelloResponse {
    pub hello: String,
}

impl Default for HelloResponse {
    fn default() -> Self {
        Self {
            hello: "world".to_string(),
        }
    }
}
