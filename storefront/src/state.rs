// storefront/src/state.rs

use std::sync::Arc;

use ziben::{
  AdminPolicy, CatalogReader, CatalogStore, ChatModel, ChatRelay, CredentialStore, FederatedVerifier,
  IdentityService, OrderHistoryReader, OrderStore, PaymentConfirmationService, PaymentGateway, ProfileStore,
};

use crate::config::AppConfig;
use crate::services::SessionIssuer;

/// Everything the services need from the outside world. `main` fills this with Postgres stores
/// and HTTP clients; tests fill it with in-memory stores and stubs.
pub struct Backends {
  pub gateway: Arc<dyn PaymentGateway>,
  pub orders: Arc<dyn OrderStore>,
  pub profiles: Arc<dyn ProfileStore>,
  pub credentials: Arc<dyn CredentialStore>,
  pub catalog: Arc<dyn CatalogStore>,
  pub federated: Option<Arc<dyn FederatedVerifier>>,
  pub chat_model: Arc<dyn ChatModel>,
}

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub payments: Arc<PaymentConfirmationService>,
  pub orders: Arc<OrderHistoryReader>,
  pub identity: Arc<IdentityService>,
  pub catalog: Arc<CatalogReader>,
  pub chat: Arc<ChatRelay>,
  pub sessions: Arc<SessionIssuer>,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, backends: Backends) -> Self {
    let admin_policy = AdminPolicy::from_list(&config.admin_emails);
    let sessions = SessionIssuer::new(config.jwt_secret.clone(), config.session_ttl);

    Self {
      payments: Arc::new(PaymentConfirmationService::new(
        backends.gateway,
        backends.orders.clone(),
        backends.profiles.clone(),
      )),
      orders: Arc::new(OrderHistoryReader::new(backends.orders)),
      identity: Arc::new(IdentityService::new(
        backends.credentials,
        backends.profiles,
        backends.federated,
        admin_policy,
      )),
      catalog: Arc::new(CatalogReader::new(backends.catalog)),
      chat: Arc::new(ChatRelay::new(backends.chat_model)),
      sessions: Arc::new(sessions),
      config,
    }
  }
}
