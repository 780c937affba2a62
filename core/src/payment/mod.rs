// core/src/payment/mod.rs

//! Payment confirmation: client-reported payment reference in, gateway-verified order out.

pub mod confirmation;
pub mod failure;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ZibenError};
use crate::models::PaymentDetails;

pub use confirmation::{ConfirmedOrder, PaymentConfirmationService};

/// Body of a confirmation request as the browser sends it. Nothing here is trusted yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentInput {
  pub payment_key: Option<String>,
  pub order_id: Option<String>,
  pub amount: Option<i64>,
  pub user_id: Option<String>,
}

/// Validated request forwarded to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
  pub payment_key: String,
  pub order_id: String,
  pub amount: i64,
}

impl ConfirmPaymentInput {
  /// Splits the input into the gateway request and the owning user id (`None` for guests).
  pub fn validate(self) -> Result<(ConfirmPaymentRequest, Option<String>)> {
    let payment_key = non_blank(self.payment_key);
    let order_id = non_blank(self.order_id);
    let amount = self.amount.filter(|a| *a > 0);

    let (payment_key, order_id, amount) = match (payment_key, order_id, amount) {
      (Some(k), Some(o), Some(a)) => (k, o, a),
      (k, o, a) => {
        let mut missing = Vec::new();
        if k.is_none() {
          missing.push("paymentKey");
        }
        if o.is_none() {
          missing.push("orderId");
        }
        if a.is_none() {
          missing.push("amount");
        }
        return Err(ZibenError::Validation(format!(
          "Required payment parameters are missing or invalid: {}",
          missing.join(", ")
        )));
      }
    };

    let owner = non_blank(self.user_id).filter(|uid| uid != "guest");
    Ok((ConfirmPaymentRequest { payment_key, order_id, amount }, owner))
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Successful gateway confirmation. `payload` is the gateway body, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedPayment {
  pub payload: Value,
}

impl ConfirmedPayment {
  pub fn new(payload: Value) -> Self {
    Self { payload }
  }

  pub fn details(&self) -> Result<PaymentDetails> {
    serde_json::from_value(self.payload.clone())
      .map_err(|e| ZibenError::Internal(format!("Unreadable confirmation payload: {}", e)))
  }
}

/// External payment processor. The sole source of truth for payment success.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Confirms a payment the browser has authorised.
  ///
  /// A non-success answer from the gateway must surface as
  /// [`ZibenError::PaymentGateway`] with the gateway's status, code and message.
  async fn confirm(&self, request: &ConfirmPaymentRequest) -> Result<ConfirmedPayment>;
}
