// storefront/src/db/orders.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use ziben::{NewOrder, OrderRecord, OrderStore, Result, ZibenError};

use super::store_error;

const ORDER_COLUMNS: &str = "id, order_id, order_name, payment_key, method, total_amount, status, \
   requested_at, approved_at, customer_email, customer_name, user_id, created_at";

#[derive(Debug, FromRow)]
struct OrderRow {
  id: String,
  order_id: String,
  order_name: String,
  payment_key: String,
  method: String,
  total_amount: i64,
  status: String,
  requested_at: Option<String>,
  approved_at: Option<String>,
  customer_email: String,
  customer_name: String,
  user_id: Option<String>,
  created_at: DateTime<Utc>,
}

impl From<OrderRow> for OrderRecord {
  fn from(row: OrderRow) -> Self {
    OrderRecord {
      id: row.id,
      order_id: row.order_id,
      order_name: row.order_name,
      payment_key: row.payment_key,
      method: row.method,
      total_amount: row.total_amount,
      status: row.status,
      requested_at: row.requested_at,
      approved_at: row.approved_at,
      customer_email: row.customer_email,
      customer_name: row.customer_name,
      user_id: row.user_id,
      created_at: row.created_at,
    }
  }
}

#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "pg::orders::insert", skip(self, order), fields(order_id = %order.order_id), err(Display))]
  async fn insert(&self, order: NewOrder) -> Result<OrderRecord> {
    let record = order.into_record(Uuid::new_v4().to_string(), Utc::now());
    sqlx::query(
      "INSERT INTO orders (id, order_id, order_name, payment_key, method, total_amount, status, \
       requested_at, approved_at, customer_email, customer_name, user_id, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(&record.id)
    .bind(&record.order_id)
    .bind(&record.order_name)
    .bind(&record.payment_key)
    .bind(&record.method)
    .bind(record.total_amount)
    .bind(&record.status)
    .bind(&record.requested_at)
    .bind(&record.approved_at)
    .bind(&record.customer_email)
    .bind(&record.customer_name)
    .bind(&record.user_id)
    .bind(record.created_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      store_error(e, || {
        format!("An order for payment key {} is already recorded.", record.payment_key)
      })
    })?;
    debug!(id = %record.id, "Order row inserted.");
    Ok(record)
  }

  async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE user_id = $1", ORDER_COLUMNS))
      .bind(user_id)
      .fetch_all(&self.pool)
      .await
      .map_err(ZibenError::persistence)?;
    Ok(rows.into_iter().map(OrderRecord::from).collect())
  }

  async fn list_all(&self) -> Result<Vec<OrderRecord>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders", ORDER_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(ZibenError::persistence)?;
    Ok(rows.into_iter().map(OrderRecord::from).collect())
  }
}
