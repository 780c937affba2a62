// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::{self, BoxStream, StreamExt};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;

use ziben::store::memory::{MemoryOrderStore, MemoryProfileStore};
use ziben::{
  AuthIdentity, ChatModel, ChatTurn, ConfirmPaymentInput, ConfirmPaymentRequest, ConfirmedPayment, FederatedVerifier,
  NewOrder, OrderRecord, OrderStore, PaymentConfirmationService, PaymentGateway, ProfileStore, Result, UserProfile,
  ZibenError,
};

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

// --- Gateway fakes ---

/// What the stub gateway answers with.
#[derive(Clone, Debug)]
pub enum GatewayReply {
  Success(Value),
  Reject { status: u16, code: &'static str, message: &'static str },
  Unreachable,
}

/// Records every confirmation it receives and answers with a fixed reply.
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
    self.calls.lock().len()
  }
}

#[async_trait]
impl PaymentGateway for StubGateway {
  async fn confirm(&self, request: &ConfirmPaymentRequest) -> Result<ConfirmedPayment> {
    self.calls.lock().push(request.clone());
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

/// Gateway confirmation body in the shape the real gateway sends.
pub fn done_payload(payment_key: &str, order_id: &str, total_amount: i64, approved_at: &str) -> Value {
  json!({
    "mId": "tvivarepublica",
    "paymentKey": payment_key,
    "orderId": order_id,
    "orderName": "고급 안전화 외 1건",
    "method": "CARD",
    "totalAmount": total_amount,
    "balanceAmount": total_amount,
    "status": "DONE",
    "requestedAt": "2024-01-01T08:59:30+09:00",
    "approvedAt": approved_at,
    "card": {
      "issuerCode": "61",
      "number": "43301234****123*",
      "approveNo": "00000000",
      "customerName": null
    },
    "virtualAccount": null
  })
}

// --- Order store fakes ---

/// Order store whose writes always fail. Reads delegate to an inner memory store.
#[derive(Default)]
pub struct FailingOrderStore {
  pub inner: MemoryOrderStore,
  pub insert_attempts: AtomicUsize,
}

#[async_trait]
impl OrderStore for FailingOrderStore {
  async fn insert(&self, _order: NewOrder) -> Result<OrderRecord> {
    self.insert_attempts.fetch_add(1, Ordering::SeqCst);
    Err(ZibenError::persistence(anyhow::anyhow!("injected write failure")))
  }

  async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>> {
    self.inner.list_for_user(user_id).await
  }

  async fn list_all(&self) -> Result<Vec<OrderRecord>> {
    self.inner.list_all().await
  }
}

// --- Profile store fakes ---

/// Profile store whose first `failures` inserts fail. Everything else delegates to memory.
#[derive(Default)]
pub struct FlakyProfileStore {
  pub inner: MemoryProfileStore,
  pub failures: AtomicUsize,
}

impl FlakyProfileStore {
  pub fn failing_first(failures: usize) -> Self {
    Self {
      inner: MemoryProfileStore::new(),
      failures: AtomicUsize::new(failures),
    }
  }
}

#[async_trait]
impl ProfileStore for FlakyProfileStore {
  async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
    self.inner.get(uid).await
  }

  async fn insert(&self, profile: UserProfile) -> Result<UserProfile> {
    let remaining = self.failures.load(Ordering::SeqCst);
    if remaining > 0 {
      self.failures.store(remaining - 1, Ordering::SeqCst);
      return Err(ZibenError::persistence(anyhow::anyhow!("injected profile write failure")));
    }
    self.inner.insert(profile).await
  }

  async fn list(&self) -> Result<Vec<UserProfile>> {
    self.inner.list().await
  }
}

pub fn confirm_input(payment_key: &str, order_id: &str, amount: i64, user_id: Option<&str>) -> ConfirmPaymentInput {
  ConfirmPaymentInput {
    payment_key: Some(payment_key.to_string()),
    order_id: Some(order_id.to_string()),
    amount: Some(amount),
    user_id: user_id.map(str::to_string),
  }
}

pub fn confirmation_service(
  gateway: Arc<StubGateway>,
  orders: Arc<dyn OrderStore>,
  profiles: Arc<MemoryProfileStore>,
) -> PaymentConfirmationService {
  PaymentConfirmationService::new(gateway, orders, profiles)
}

pub fn order_for(user_id: Option<&str>, order_id: &str, approved_at: &str) -> NewOrder {
  NewOrder {
    order_id: order_id.to_string(),
    order_name: format!("{} 상품", order_id),
    payment_key: format!("pk-{}", order_id),
    method: "CARD".to_string(),
    total_amount: 10000,
    status: "DONE".to_string(),
    requested_at: None,
    approved_at: Some(approved_at.to_string()),
    customer_email: String::new(),
    customer_name: String::new(),
    user_id: user_id.map(str::to_string),
  }
}

// --- Identity fakes ---

/// Accepts tokens of the form `valid:<sub>:<email>[:<name>]`.
pub struct FakeVerifier;

#[async_trait]
impl FederatedVerifier for FakeVerifier {
  async fn verify(&self, id_token: &str) -> Result<AuthIdentity> {
    let parts: Vec<&str> = id_token.split(':').collect();
    match parts.as_slice() {
      ["valid", sub, email] => Ok(AuthIdentity {
        uid: format!("google:{}", sub),
        email: email.to_string(),
        display_name: None,
      }),
      ["valid", sub, email, name] => Ok(AuthIdentity {
        uid: format!("google:{}", sub),
        email: email.to_string(),
        display_name: Some(name.to_string()),
      }),
      _ => Err(ZibenError::Auth("Invalid ID token.".to_string())),
    }
  }
}

// --- Chat fakes ---

/// Streams back a fixed list of chunks and remembers the last turn it was given.
pub struct ScriptedModel {
  chunks: Vec<Result<String>>,
  fail_with_quota: bool,
  pub last_turn: Mutex<Option<ChatTurn>>,
}

impl ScriptedModel {
  pub fn replying(chunks: &[&str]) -> Arc<Self> {
    Arc::new(Self {
      chunks: chunks.iter().map(|c| Ok(c.to_string())).collect(),
      fail_with_quota: false,
      last_turn: Mutex::new(None),
    })
  }

  pub fn failing_mid_stream(first: &str) -> Arc<Self> {
    Arc::new(Self {
      chunks: vec![
        Ok(first.to_string()),
        Err(ZibenError::Upstream {
          status: 500,
          message: "stream reset".to_string(),
        }),
      ],
      fail_with_quota: false,
      last_turn: Mutex::new(None),
    })
  }

  pub fn over_quota() -> Arc<Self> {
    Arc::new(Self {
      chunks: vec![],
      fail_with_quota: true,
      last_turn: Mutex::new(None),
    })
  }
}

#[async_trait]
impl ChatModel for ScriptedModel {
  async fn stream_reply(&self, turn: ChatTurn) -> Result<BoxStream<'static, Result<String>>> {
    *self.last_turn.lock() = Some(turn);
    if self.fail_with_quota {
      return Err(ZibenError::UpstreamQuota("Resource has been exhausted".to_string()));
    }
    let chunks: Vec<Result<String>> = self
      .chunks
      .iter()
      .map(|c| match c {
        Ok(text) => Ok(text.clone()),
        Err(ZibenError::Upstream { status, message }) => Err(ZibenError::Upstream {
          status: *status,
          message: message.clone(),
        }),
        Err(other) => Err(ZibenError::Internal(other.to_string())),
      })
      .collect();
    Ok(stream::iter(chunks).boxed())
  }
}

pub fn now_rfc3339() -> String {
  Utc::now().to_rfc3339()
}
