// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_orders", skip(app_state, user), fields(uid = %user.uid()))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_visible(&user.viewer()).await?;
  info!(count = orders.len(), "Orders fetched.");
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
