// core/src/payment/confirmation.rs

use std::sync::Arc;

use tracing::{error, field, info, instrument, warn, Span};

use crate::error::Result;
use crate::models::{NewOrder, OrderRecord, PaymentDetails};
use crate::payment::{ConfirmPaymentInput, ConfirmPaymentRequest, ConfirmedPayment, PaymentGateway};
use crate::store::{OrderStore, ProfileStore};

/// Outcome of a confirmation the gateway accepted.
#[derive(Debug, Clone)]
pub struct ConfirmedOrder {
  pub payment: ConfirmedPayment,
  /// `None` when bookkeeping failed. The payment itself still succeeded.
  pub recorded: Option<OrderRecord>,
}

/// Turns a client-asserted payment into a gateway-verified, persisted order.
///
/// The gateway decides success. Order bookkeeping runs only afterwards and is best-effort:
/// once money has moved, a failed write is logged and the caller still gets the confirmation.
pub struct PaymentConfirmationService {
  gateway: Arc<dyn PaymentGateway>,
  orders: Arc<dyn OrderStore>,
  profiles: Arc<dyn ProfileStore>,
}

impl PaymentConfirmationService {
  pub fn new(gateway: Arc<dyn PaymentGateway>, orders: Arc<dyn OrderStore>, profiles: Arc<dyn ProfileStore>) -> Self {
    Self {
      gateway,
      orders,
      profiles,
    }
  }

  #[instrument(
    name = "payment::confirm",
    skip(self, input),
    fields(order_id = field::Empty, payment_key = field::Empty, guest = field::Empty),
    err(Display)
  )]
  pub async fn confirm(&self, input: ConfirmPaymentInput) -> Result<ConfirmedOrder> {
    let (request, owner) = input.validate()?;
    let span = Span::current();
    span.record("order_id", request.order_id.as_str());
    span.record("payment_key", request.payment_key.as_str());
    span.record("guest", owner.is_none());

    let payment = match self.gateway.confirm(&request).await {
      Ok(p) => p,
      Err(e) => {
        warn!(error = %e, "Gateway did not confirm the payment; no order will be recorded.");
        return Err(e);
      }
    };
    info!("Payment confirmed by gateway.");

    let recorded = match self.record_order(&request, &payment, owner.as_deref()).await {
      Ok(order) => {
        info!(record_id = %order.id, "Order recorded.");
        Some(order)
      }
      Err(e) => {
        error!(
          error = %e,
          order_id = %request.order_id,
          payment_key = %request.payment_key,
          "Payment succeeded but the order could not be recorded."
        );
        None
      }
    };

    Ok(ConfirmedOrder { payment, recorded })
  }

  async fn record_order(
    &self,
    request: &ConfirmPaymentRequest,
    payment: &ConfirmedPayment,
    owner: Option<&str>,
  ) -> Result<OrderRecord> {
    let details = payment.details()?;
    let (customer_name, customer_email) = self.resolve_customer(&details, owner).await;

    // Identifiers the gateway left blank come from the confirmed request.
    let order = NewOrder {
      order_id: or_requested(details.order_id, &request.order_id),
      order_name: details.order_name,
      payment_key: or_requested(details.payment_key, &request.payment_key),
      method: details.method,
      total_amount: details.total_amount,
      status: details.status,
      requested_at: details.requested_at,
      approved_at: details.approved_at,
      customer_email,
      customer_name,
      user_id: owner.map(str::to_string),
    };
    self.orders.insert(order).await
  }

  /// Gateway payer hints first, then the owner's profile, then empty guest values.
  async fn resolve_customer(&self, details: &PaymentDetails, owner: Option<&str>) -> (String, String) {
    let mut name = details.customer_name().map(str::to_string);
    let mut email = details.customer_email().map(str::to_string);

    if let (Some(uid), true) = (owner, name.is_none() || email.is_none()) {
      match self.profiles.get(uid).await {
        Ok(Some(profile)) => {
          name.get_or_insert(profile.name);
          email.get_or_insert(profile.email);
        }
        Ok(None) => warn!(user_id = %uid, "Order owner has no stored profile."),
        Err(e) => warn!(user_id = %uid, error = %e, "Profile lookup failed while recording order."),
      }
    }

    (name.unwrap_or_default(), email.unwrap_or_default())
  }
}

fn or_requested(reported: String, requested: &str) -> String {
  if reported.trim().is_empty() {
    requested.to_string()
  } else {
    reported
  }
}
