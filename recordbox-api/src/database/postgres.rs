use super::{schema, RecordStore, StoredFile};
use crate::config::DatabaseConfig;
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared_types::{FileInfo, MessageInfo};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens the pool and checks that the server answers.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = config.connect_options()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.ping().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_schema(&self) -> AppResult<()> {
        for statement in schema::ALL_TABLES {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_file(&self, name: &str, contents: &[u8]) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO files (name, file) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(contents)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_files(&self) -> AppResult<Vec<FileInfo>> {
        // A row that does not decode fails the whole query.
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT id, name, created_at FROM files ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FileInfo::from).collect())
    }

    async fn get_file(&self, id: i32) -> AppResult<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>("SELECT name, file FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file)
    }

    async fn insert_message(&self, message: &str) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO messages (message) VALUES ($1) RETURNING id",
        )
        .bind(message)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_messages(&self) -> AppResult<Vec<MessageInfo>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, message, created_at FROM messages ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MessageInfo::from).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FileRow {
    id: i32,
    name: String,
    created_at: NaiveDateTime,
}

impl From<FileRow> for FileInfo {
    fn from(row: FileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i32,
    message: String,
    created_at: NaiveDateTime,
}

impl From<MessageRow> for MessageInfo {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            message: row.message,
            created_at: row.created_at,
        }
    }
}
