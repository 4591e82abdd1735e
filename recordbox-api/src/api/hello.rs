use actix_web::{HttpResponse, Result};
use shared_types::HelloResponse;

pub async fn hello() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HelloResponse::default()))
}
