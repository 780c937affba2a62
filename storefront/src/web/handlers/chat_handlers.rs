// storefront/src/web/handlers/chat_handlers.rs

use actix_web::web::Bytes;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use tracing::instrument;

use ziben::ChatRequest;

use crate::errors::AppError;
use crate::state::AppState;

/// `POST /api/chat`. Streams `0:"<text>"` lines as plain text.
///
/// Errors before the first chunk become a JSON error response. Errors mid-stream end the body.
#[instrument(name = "handler::chat", skip(app_state, req_payload))]
pub async fn chat_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
  let lines = app_state.chat.relay(req_payload.into_inner()).await?;
  let body = lines.map(|line| line.map(Bytes::from).map_err(AppError::from));

  Ok(
    HttpResponse::Ok()
      .content_type("text/plain; charset=utf-8")
      .streaming(body),
  )
}
