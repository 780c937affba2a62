// core/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order as written to the order store. Written once per confirmed payment, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
  /// Store-assigned record identifier, distinct from the business `order_id`.
  pub id: String,
  pub order_id: String,
  pub order_name: String,
  pub payment_key: String,
  pub method: String,
  pub total_amount: i64,
  /// Gateway status string, stored verbatim (e.g. `DONE`, `CANCELED`).
  pub status: String,
  pub requested_at: Option<String>,
  pub approved_at: Option<String>,
  pub customer_email: String,
  pub customer_name: String,
  /// `None` for guest checkouts.
  pub user_id: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Order fields taken from the gateway response, before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub order_id: String,
  pub order_name: String,
  pub payment_key: String,
  pub method: String,
  pub total_amount: i64,
  pub status: String,
  pub requested_at: Option<String>,
  pub approved_at: Option<String>,
  pub customer_email: String,
  pub customer_name: String,
  pub user_id: Option<String>,
}

impl NewOrder {
  pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> OrderRecord {
    OrderRecord {
      id,
      order_id: self.order_id,
      order_name: self.order_name,
      payment_key: self.payment_key,
      method: self.method,
      total_amount: self.total_amount,
      status: self.status,
      requested_at: self.requested_at,
      approved_at: self.approved_at,
      customer_email: self.customer_email,
      customer_name: self.customer_name,
      user_id: self.user_id,
      created_at,
    }
  }
}
