// core/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry. Read-only for the storefront; stock is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub name: String,
  pub category: String,
  pub price: i64,
  pub original_price: Option<i64>,
  /// Percent off `original_price`.
  pub discount: Option<i32>,
  pub rating: f64,
  pub reviews: i32,
  pub description: String,
  pub features: Vec<String>,
  pub sizes: Vec<String>,
  pub colors: Vec<String>,
  pub stock: i32,
  pub image_url: String,
  pub thumbnails: Vec<String>,
  pub badge: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: String,
  pub name: String,
  pub description: String,
  pub icon: String,
  pub display_order: i32,
}
