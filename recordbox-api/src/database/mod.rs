//! Storage seam for the API.
//!
//! Handlers only see [`RecordStore`]; [`PgStore`] is the production
//! implementation and tests plug in their own.

use crate::error::AppResult;
use async_trait::async_trait;
use shared_types::{FileInfo, MessageInfo};
use std::sync::Arc;

mod postgres;
pub mod schema;

pub use postgres::PgStore;

/// Name and payload of a stored file, as served by the download endpoint.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredFile {
    pub name: String,
    #[sqlx(rename = "file")]
    pub contents: Vec<u8>,
}

/// One statement per call; implementations must be safe to share across
/// worker threads.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    /// Inserts a file and returns the id the store assigned.
    async fn insert_file(&self, name: &str, contents: &[u8]) -> AppResult<i32>;

    /// All files, newest first.
    async fn list_files(&self) -> AppResult<Vec<FileInfo>>;

    async fn get_file(&self, id: i32) -> AppResult<Option<StoredFile>>;

    async fn insert_message(&self, message: &str) -> AppResult<i32>;

    /// All messages, newest first.
    async fn list_messages(&self) -> AppResult<Vec<MessageInfo>>;
}

pub type SharedStore = Arc<dyn RecordStore>;
