use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const CREATED_STATUS: &str = "created";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct MessageInfo {
    pub id: i32,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct MessageListResponse {
    pub messages: Vec<MessageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMessageRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMessageResponse {
    pub id: i32,
    pub message: String,
    pub status: String,
}

impl CreateMessageResponse {
    pub fn created(id: i32, message: String) -> Self {
        Self {
            id,
            message,
            status: CREATED_STATUS.to_string(),
        }
    }
}
