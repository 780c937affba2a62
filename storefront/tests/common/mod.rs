// storefront/tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::{self, BoxStream, StreamExt};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::Level;

use ziben::store::memory::{MemoryCatalogStore, MemoryCredentialStore, MemoryOrderStore, MemoryProfileStore};
use ziben::{
  AuthIdentity, Category, ChatModel, ChatTurn, ConfirmPaymentRequest, ConfirmedPayment, FederatedVerifier, NewOrder,
  OrderRecord, OrderStore, PaymentGateway, Product, Result, Role, UserProfile, ZibenError,
};
use ziben_storefront::config::AppConfig;
use ziben_storefront::state::{AppState, Backends};

pub const ADMIN_EMAIL: &str = "owner@ziben.co.kr";

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn test_config() -> AppConfig {
  let vars: HashMap<&str, &str> = HashMap::from([
    ("DATABASE_URL", "postgres://unused/ziben"),
    ("TOSS_SECRET_KEY", "test_sk_ziben"),
    ("JWT_SECRET", "storefront-test-secret"),
    ("ADMIN_EMAILS", ADMIN_EMAIL),
  ]);
  AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).expect("test config")
}

// --- Gateway stub ---

#[derive(Clone, Debug)]
pub enum GatewayReply {
  Success(Value),
  Reject { status: u16, code: &'static str, message: &'static str },
  Unreachable,
}

pub struct StubGateway {
  reply: GatewayReply,
  pub calls: Mutex<Vec<ConfirmPaymentRequest>>,
}

impl StubGateway {
  pub fn new(reply: GatewayReply) -> Arc<Self> {
    Arc::new(Self {
      reply,
      calls: Mutex::new(Vec::new()),
    })
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }
}

#[async_trait]
impl PaymentGateway for StubGateway {
  async fn confirm(&self, request: &ConfirmPaymentRequest) -> Result<ConfirmedPayment> {
    self.calls.lock().unwrap().push(request.clone());
    match &self.reply {
      GatewayReply::Success(payload) => Ok(ConfirmedPayment::new(payload.clone())),
      GatewayReply::Reject { status, code, message } => Err(ZibenError::PaymentGateway {
        status: *status,
        code: Some(code.to_string()),
        message: message.to_string(),
      }),
      GatewayReply::Unreachable => Err(ZibenError::GatewayUnavailable("connection refused".to_string())),
    }
  }
}

pub fn done_payload(payment_key: &str, order_id: &str, total_amount: i64) -> Value {
  json!({
    "paymentKey": payment_key,
    "orderId": order_id,
    "orderName": "고급 안전화 외 1건",
    "method": "CARD",
    "totalAmount": total_amount,
    "status": "DONE",
    "requestedAt": "2024-01-01T08:59:30+09:00",
    "approvedAt": "2024-01-01T09:00:00+09:00",
    "card": { "customerName": "김지수", "customerEmail": "kim@example.com" }
  })
}

/// Order store that refuses every write.
#[derive(Default)]
pub struct FailingOrderStore {
  pub inner: MemoryOrderStore,
}

#[async_trait]
impl OrderStore for FailingOrderStore {
  async fn insert(&self, _order: NewOrder) -> Result<OrderRecord> {
    Err(ZibenError::persistence(anyhow::anyhow!("injected write failure")))
  }

  async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>> {
    self.inner.list_for_user(user_id).await
  }

  async fn list_all(&self) -> Result<Vec<OrderRecord>> {
    self.inner.list_all().await
  }
}

// --- Identity stub ---

/// Accepts tokens of the form `valid:<sub>:<email>`.
pub struct FakeVerifier;

#[async_trait]
impl FederatedVerifier for FakeVerifier {
  async fn verify(&self, id_token: &str) -> Result<AuthIdentity> {
    match id_token.split(':').collect::<Vec<_>>().as_slice() {
      ["valid", sub, email] => Ok(AuthIdentity {
        uid: format!("google:{}", sub),
        email: email.to_string(),
        display_name: None,
      }),
      _ => Err(ZibenError::Auth("Invalid identity token.".to_string())),
    }
  }
}

// --- Chat stub ---

pub struct ScriptedModel {
  chunks: Vec<String>,
  over_quota: bool,
  pub last_turn: Mutex<Option<ChatTurn>>,
}

impl ScriptedModel {
  pub fn replying(chunks: &[&str]) -> Arc<Self> {
    Arc::new(Self {
      chunks: chunks.iter().map(|c| c.to_string()).collect(),
      over_quota: false,
      last_turn: Mutex::new(None),
    })
  }

  pub fn over_quota() -> Arc<Self> {
    Arc::new(Self {
      chunks: Vec::new(),
      over_quota: true,
      last_turn: Mutex::new(None),
    })
  }
}

#[async_trait]
impl ChatModel for ScriptedModel {
  async fn stream_reply(&self, turn: ChatTurn) -> Result<BoxStream<'static, Result<String>>> {
    *self.last_turn.lock().unwrap() = Some(turn);
    if self.over_quota {
      return Err(ZibenError::UpstreamQuota("Resource has been exhausted".to_string()));
    }
    Ok(stream::iter(self.chunks.clone().into_iter().map(Ok)).boxed())
  }
}

// --- Catalog fixtures ---

pub fn product(id: &str, name: &str, category: &str, price: i64) -> Product {
  let now = Utc::now();
  Product {
    id: id.to_string(),
    name: name.to_string(),
    category: category.to_string(),
    price,
    original_price: None,
    discount: None,
    rating: 4.5,
    reviews: 12,
    description: String::new(),
    features: vec![],
    sizes: vec!["260".to_string()],
    colors: vec![],
    stock: 10,
    image_url: String::new(),
    thumbnails: vec![],
    badge: None,
    created_at: now,
    updated_at: now,
  }
}

pub fn category(id: &str, name: &str, display_order: i32) -> Category {
  Category {
    id: id.to_string(),
    name: name.to_string(),
    description: String::new(),
    icon: String::new(),
    display_order,
  }
}

// --- App state ---

/// Memory-backed collaborators, kept around so tests can inspect them after requests.
pub struct TestBackends {
  pub gateway: Arc<StubGateway>,
  pub orders: Arc<MemoryOrderStore>,
  pub profiles: Arc<MemoryProfileStore>,
  pub credentials: Arc<MemoryCredentialStore>,
  pub catalog: Arc<MemoryCatalogStore>,
  pub chat_model: Arc<ScriptedModel>,
  pub federated_enabled: bool,
}

impl TestBackends {
  pub fn new(reply: GatewayReply) -> Self {
    Self {
      gateway: StubGateway::new(reply),
      orders: Arc::new(MemoryOrderStore::new()),
      profiles: Arc::new(MemoryProfileStore::new()),
      credentials: Arc::new(MemoryCredentialStore::new()),
      catalog: Arc::new(MemoryCatalogStore::with_catalog(
        vec![
          product("shoe-1", "절연 안전화", "안전화", 95_000),
          product("shoe-2", "경량 안전화", "안전화", 59_000),
          product("wear-1", "동계 방한 파카", "추동복", 89_000),
        ],
        vec![
          category("safety-shoes", "안전화", 3),
          category("spring-summer", "춘하복", 1),
          category("fall-winter", "추동복", 2),
        ],
      )),
      chat_model: ScriptedModel::replying(&["안녕하세요"]),
      federated_enabled: true,
    }
  }

  pub fn state(&self) -> AppState {
    self.state_with_orders(self.orders.clone())
  }

  pub fn state_with_orders(&self, orders: Arc<dyn OrderStore>) -> AppState {
    let federated: Option<Arc<dyn FederatedVerifier>> = if self.federated_enabled {
      Some(Arc::new(FakeVerifier))
    } else {
      None
    };
    AppState::new(
      Arc::new(test_config()),
      Backends {
        gateway: self.gateway.clone(),
        orders,
        profiles: self.profiles.clone(),
        credentials: self.credentials.clone(),
        catalog: self.catalog.clone(),
        federated,
        chat_model: self.chat_model.clone(),
      },
    )
  }
}

pub fn profile(uid: &str, email: &str, role: Role) -> UserProfile {
  UserProfile {
    uid: uid.to_string(),
    email: email.to_string(),
    name: "테스트 사용자".to_string(),
    role,
    phone: None,
    company: None,
    created_at: Utc::now(),
  }
}

/// Stores the profile and returns an `Authorization` header value for it.
pub async fn signed_in(backends: &TestBackends, state: &AppState, profile: UserProfile) -> String {
  use ziben::ProfileStore;
  let session = state.sessions.issue(&profile).expect("issue session");
  backends.profiles.insert(profile).await.expect("insert profile");
  format!("Bearer {}", session.token)
}
