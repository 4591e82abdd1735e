pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;

pub use database::{PgStore, RecordStore, SharedStore, StoredFile};
pub use error::{AppError, AppResult};
