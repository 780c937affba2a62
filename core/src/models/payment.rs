// core/src/models/payment.rs

use serde::Deserialize;

/// Typed view over a gateway confirmation payload.
///
/// Every field is optional on the wire; the raw payload is what gets returned to the caller,
/// this view only feeds the order record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentDetails {
  pub order_id: String,
  pub order_name: String,
  pub payment_key: String,
  pub method: String,
  pub total_amount: i64,
  pub status: String,
  pub requested_at: Option<String>,
  pub approved_at: Option<String>,
  pub card: Option<PayerHints>,
  pub virtual_account: Option<PayerHints>,
}

/// Payer identity the gateway attaches under an instrument-specific key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayerHints {
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
}

impl PaymentDetails {
  /// First non-blank customer name across the instrument hints, card first.
  pub fn customer_name(&self) -> Option<&str> {
    self.hint(|h| h.customer_name.as_deref())
  }

  /// First non-blank customer email across the instrument hints, card first.
  pub fn customer_email(&self) -> Option<&str> {
    self.hint(|h| h.customer_email.as_deref())
  }

  fn hint<'a>(&'a self, pick: impl Fn(&'a PayerHints) -> Option<&'a str>) -> Option<&'a str> {
    [self.card.as_ref(), self.virtual_account.as_ref()]
      .into_iter()
      .flatten()
      .filter_map(pick)
      .find(|v| !v.trim().is_empty())
  }
}
