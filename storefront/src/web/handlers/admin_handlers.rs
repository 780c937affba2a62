// storefront/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::admin_summary", skip(app_state, user), fields(uid = %user.uid()))]
pub async fn summary_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  user.require_admin()?;

  let sales = app_state.orders.sales_summary().await?;
  let user_count = app_state.identity.list_profiles().await?.len();
  let product_count = app_state.catalog.list_products(None).await?.len();
  info!(orders = sales.order_count, users = user_count, products = product_count, "Summary built.");

  Ok(HttpResponse::Ok().json(json!({
    "orderCount": sales.order_count,
    "totalRevenue": sales.total_revenue,
    "userCount": user_count,
    "productCount": product_count,
    "topProducts": sales.top_products,
  })))
}

#[instrument(name = "handler::admin_users", skip(app_state, user), fields(uid = %user.uid()))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  user.require_admin()?;
  let users = app_state.identity.list_profiles().await?;
  Ok(HttpResponse::Ok().json(json!({ "users": users })))
}
