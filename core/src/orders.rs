// core/src/orders.rs

//! Role-aware order history and the admin sales summary.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::models::{OrderRecord, Role};
use crate::store::OrderStore;

const TOP_PRODUCT_LIMIT: usize = 4;

/// Whoever is asking for orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
  pub uid: String,
  pub role: Role,
}

pub struct OrderHistoryReader {
  orders: Arc<dyn OrderStore>,
}

impl OrderHistoryReader {
  pub fn new(orders: Arc<dyn OrderStore>) -> Self {
    Self { orders }
  }

  /// Orders the viewer may see, most recently approved first.
  ///
  /// Admins see every order; everyone else sees only orders they own. No pagination.
  #[instrument(name = "orders::list_visible", skip(self), fields(uid = %viewer.uid, role = %viewer.role), err(Display))]
  pub async fn list_visible(&self, viewer: &Viewer) -> Result<Vec<OrderRecord>> {
    let mut orders = match viewer.role {
      Role::Admin => self.orders.list_all().await?,
      Role::User => self.orders.list_for_user(&viewer.uid).await?,
    };
    sort_by_approval_desc(&mut orders);
    debug!(count = orders.len(), "Fetched visible orders.");
    Ok(orders)
  }

  #[instrument(name = "orders::sales_summary", skip(self), err(Display))]
  pub async fn sales_summary(&self) -> Result<SalesSummary> {
    let orders = self.orders.list_all().await?;
    Ok(SalesSummary::from_orders(&orders))
  }
}

fn approval_time(order: &OrderRecord) -> Option<DateTime<FixedOffset>> {
  order
    .approved_at
    .as_deref()
    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// Newest `approved_at` first. Missing or unparseable timestamps go last; ties keep store order.
pub fn sort_by_approval_desc(orders: &mut [OrderRecord]) {
  orders.sort_by(|a, b| match (approval_time(a), approval_time(b)) {
    (Some(x), Some(y)) => y.cmp(&x),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  });
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
  pub name: String,
  pub sales: u64,
  pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
  pub order_count: usize,
  pub total_revenue: i64,
  pub top_products: Vec<ProductSales>,
}

impl SalesSummary {
  /// Groups orders by `order_name` and keeps the best earners.
  pub fn from_orders(orders: &[OrderRecord]) -> Self {
    let mut by_name: HashMap<&str, ProductSales> = HashMap::new();
    for order in orders {
      let entry = by_name.entry(order.order_name.as_str()).or_insert_with(|| ProductSales {
        name: order.order_name.clone(),
        sales: 0,
        revenue: 0,
      });
      entry.sales += 1;
      entry.revenue += order.total_amount;
    }

    let mut top_products: Vec<ProductSales> = by_name.into_values().collect();
    top_products.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top_products.truncate(TOP_PRODUCT_LIMIT);

    Self {
      order_count: orders.len(),
      total_revenue: orders.iter().map(|o| o.total_amount).sum(),
      top_products,
    }
  }
}
