// storefront/src/services/toss_payments.rs

//! Toss Payments confirmation client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use ziben::{ConfirmPaymentRequest, ConfirmedPayment, PaymentGateway, Result, ZibenError};

const CONFIRM_PATH: &str = "/v1/payments/confirm";

#[derive(Debug, Deserialize)]
struct TossErrorBody {
  code: Option<String>,
  message: Option<String>,
}

/// Calls `POST /v1/payments/confirm` with HTTP Basic auth (`secret_key:` with an empty password).
#[derive(Clone)]
pub struct TossPaymentsClient {
  http: Client,
  secret_key: String,
  api_base: String,
}

impl TossPaymentsClient {
  pub fn new(http: Client, secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
    Self {
      http,
      secret_key: secret_key.into(),
      api_base: api_base.into(),
    }
  }

  fn confirm_url(&self) -> String {
    format!("{}{}", self.api_base.trim_end_matches('/'), CONFIRM_PATH)
  }
}

#[async_trait]
impl PaymentGateway for TossPaymentsClient {
  #[instrument(
    name = "toss::confirm",
    skip(self, request),
    fields(order_id = %request.order_id, amount = request.amount),
    err(Display)
  )]
  async fn confirm(&self, request: &ConfirmPaymentRequest) -> Result<ConfirmedPayment> {
    let response = self
      .http
      .post(self.confirm_url())
      .basic_auth(&self.secret_key, Some(""))
      .json(request)
      .send()
      .await
      .map_err(|e| {
        error!(error = %e, "Toss Payments request failed.");
        ZibenError::GatewayUnavailable(e.to_string())
      })?;

    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| {
      error!(error = %e, "Failed to read Toss Payments response body.");
      ZibenError::GatewayUnavailable(e.to_string())
    })?;

    if !status.is_success() {
      let body: TossErrorBody = serde_json::from_slice(&bytes).unwrap_or(TossErrorBody {
        code: None,
        message: None,
      });
      warn!(
        status = status.as_u16(),
        code = body.code.as_deref().unwrap_or(""),
        "Toss Payments rejected the confirmation."
      );
      return Err(ZibenError::PaymentGateway {
        status: status.as_u16(),
        code: body.code,
        message: body.message.unwrap_or_default(),
      });
    }

    let payload: Value = serde_json::from_slice(&bytes).map_err(|e| {
      error!(error = %e, "Toss Payments returned a non-JSON success body.");
      ZibenError::GatewayUnavailable(format!("Unreadable confirmation response: {}", e))
    })?;
    info!(status = status.as_u16(), "Toss Payments confirmed the payment.");
    Ok(ConfirmedPayment::new(payload))
  }
}
