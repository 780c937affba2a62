// storefront/src/web/routes.rs

use actix_web::{error, web, HttpRequest, HttpResponse};
use tracing::warn;

use crate::errors::AppError;
use crate::web::handlers::{
  admin_handlers, auth_handlers, chat_handlers, order_handlers, payment_handlers, product_handlers,
};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed or mistyped JSON bodies get the same `{message, code}` shape as every other 400.
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  warn!(error = %err, "Rejected request body.");
  AppError::validation(format!("Invalid request body: {}", err)).into()
}

pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.app_data(json_config()).service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/federated", web::post().to(auth_handlers::federated_signin_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .route(
        "/payment/confirm",
        web::post().to(payment_handlers::confirm_payment_handler),
      )
      .route("/orders", web::get().to(order_handlers::list_orders_handler))
      .service(
        web::scope("/admin")
          .route("/summary", web::get().to(admin_handlers::summary_handler))
          .route("/users", web::get().to(admin_handlers::list_users_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .route("/categories", web::get().to(product_handlers::list_categories_handler))
      .route("/chat", web::post().to(chat_handlers::chat_handler)),
  );
}
