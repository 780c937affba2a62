// storefront/src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};

use ziben_storefront::config::{AppConfig, LogFormat};
use ziben_storefront::db::{self, PgCatalogStore, PgCredentialStore, PgOrderStore, PgProfileStore};
use ziben_storefront::services::{GeminiClient, GoogleTokenVerifier, TossPaymentsClient};
use ziben_storefront::state::{AppState, Backends};
use ziben_storefront::web::configure_app_routes;

use ziben::FederatedVerifier;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Config is read before logging starts because it picks the log format.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      ziben_storefront::init_tracing(LogFormat::Text);
      tracing::error!(error = %e, "Failed to load application configuration.");
      std::process::exit(1);
    }
  };
  ziben_storefront::init_tracing(app_config.log_format);
  tracing::info!(config = ?app_config, "Starting ZIBEN storefront server...");

  let db_pool = match db::connect(&app_config).await {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!(error = %e, "Database initialisation failed.");
      std::process::exit(1);
    }
  };

  if app_config.seed_db {
    if let Err(e) = db::seed::seed_catalog(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  let http = reqwest::Client::new();

  let federated: Option<Arc<dyn FederatedVerifier>> = match &app_config.google_client_id {
    Some(client_id) => Some(Arc::new(GoogleTokenVerifier::new(
      http.clone(),
      client_id.clone(),
      app_config.google_tokeninfo_url.clone(),
    ))),
    None => {
      tracing::info!("GOOGLE_CLIENT_ID not set; federated sign-in disabled.");
      None
    }
  };

  let backends = Backends {
    gateway: Arc::new(TossPaymentsClient::new(
      http.clone(),
      app_config.toss_secret_key.clone(),
      app_config.toss_api_base.clone(),
    )),
    orders: Arc::new(PgOrderStore::new(db_pool.clone())),
    profiles: Arc::new(PgProfileStore::new(db_pool.clone())),
    credentials: Arc::new(PgCredentialStore::new(db_pool.clone())),
    catalog: Arc::new(PgCatalogStore::new(db_pool.clone())),
    federated,
    chat_model: Arc::new(GeminiClient::new(http, app_config.gemini_api_base.clone())),
  };
  let app_state = AppState::new(app_config.clone(), backends);

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
