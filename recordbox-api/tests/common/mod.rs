use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use recordbox_api::config::LimitsConfig;
use recordbox_api::routes::configure_routes;
use recordbox_api::{AppError, AppResult, RecordStore, SharedStore, StoredFile};
use shared_types::{FileInfo, MessageInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "recordbox-test-boundary";

pub struct TestApp<S> {
    pub store: Arc<MemoryStore>,
    pub app: S,
}

struct MemoryState {
    next_id: i32,
    clock: NaiveDateTime,
    files: Vec<(FileInfo, Vec<u8>)>,
    messages: Vec<MessageInfo>,
}

impl MemoryState {
    /// Every insert lands one second after the previous one.
    fn tick(&mut self) -> (i32, NaiveDateTime) {
        let id = self.next_id;
        self.next_id += 1;
        self.clock += Duration::seconds(1);
        (id, self.clock)
    }
}

/// In-memory stand-in for PostgreSQL with the same ordering rules.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        let clock = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        MemoryStore {
            state: Mutex::new(MemoryState {
                next_id: 1,
                clock,
                files: Vec::new(),
                messages: Vec::new(),
            }),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail like a lost database connection.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().unwrap().messages.len()
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.check()
    }

    async fn insert_file(&self, name: &str, contents: &[u8]) -> AppResult<i32> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let (id, created_at) = state.tick();
        state.files.push((
            FileInfo {
                id,
                name: name.to_string(),
                created_at,
            },
            contents.to_vec(),
        ));
        Ok(id)
    }

    async fn list_files(&self) -> AppResult<Vec<FileInfo>> {
        self.check()?;
        let state = self.state.lock().unwrap();
        let mut files: Vec<FileInfo> = state.files.iter().map(|(info, _)| info.clone()).collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn get_file(&self, id: i32) -> AppResult<Option<StoredFile>> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .files
            .iter()
            .find(|(info, _)| info.id == id)
            .map(|(info, contents)| StoredFile {
                name: info.name.clone(),
                contents: contents.clone(),
            }))
    }

    async fn insert_message(&self, message: &str) -> AppResult<i32> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let (id, created_at) = state.tick();
        state.messages.push(MessageInfo {
            id,
            message: message.to_string(),
            created_at,
        });
        Ok(id)
    }

    async fn list_messages(&self) -> AppResult<Vec<MessageInfo>> {
        self.check()?;
        let mut messages = self.state.lock().unwrap().messages.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }
}

pub async fn setup_test_app() -> TestApp<
    impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
> {
    setup_test_app_with_limits(LimitsConfig::default()).await
}

pub async fn setup_test_app_with_limits(
    limits: LimitsConfig,
) -> TestApp<impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>>
{
    let store = Arc::new(MemoryStore::new());
    let shared: SharedStore = store.clone();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(shared))
            .configure(|cfg| configure_routes(cfg, &limits)),
    )
    .await;

    TestApp { store, app }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// Text field sent with an explicit part `Content-Type`.
    TypedText(&'a str, &'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::TypedText(name, content_type, value) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, contents) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(contents);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/v1/files")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(parts))
        .to_request()
}
