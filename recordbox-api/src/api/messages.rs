use crate::database::SharedStore;
use crate::error::AppError;
use actix_web::{web, HttpResponse, Result};
use shared_types::{CreateMessageRequest, CreateMessageResponse, MessageListResponse};
use tracing::info;

pub async fn list_messages(store: web::Data<SharedStore>) -> Result<HttpResponse, AppError> {
    let messages = store.list_messages().await?;
    info!(count = messages.len(), "Listed messages");
    Ok(HttpResponse::Ok().json(MessageListResponse { messages }))
}

pub async fn create_message(
    store: web::Data<SharedStore>,
    request: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let CreateMessageRequest { message } = request.into_inner();
    if message.is_empty() {
        return Err(AppError::invalid_request("Message is required"));
    }

    let id = store.insert_message(&message).await?;
    info!(message_id = id, length = message.len(), "Created message");

    Ok(HttpResponse::Created().json(CreateMessageResponse::created(id, message)))
}
