// storefront/src/db/catalog.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use ziben::{CatalogStore, Category, Product, Result, ZibenError};

const PRODUCT_COLUMNS: &str = "id, name, category, price, original_price, discount, rating, reviews, \
   description, features, sizes, colors, stock, image_url, thumbnails, badge, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ProductRow {
  id: String,
  name: String,
  category: String,
  price: i64,
  original_price: Option<i64>,
  discount: Option<i32>,
  rating: f64,
  reviews: i32,
  description: String,
  features: Vec<String>,
  sizes: Vec<String>,
  colors: Vec<String>,
  stock: i32,
  image_url: String,
  thumbnails: Vec<String>,
  badge: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      category: row.category,
      price: row.price,
      original_price: row.original_price,
      discount: row.discount,
      rating: row.rating,
      reviews: row.reviews,
      description: row.description,
      features: row.features,
      sizes: row.sizes,
      colors: row.colors,
      stock: row.stock,
      image_url: row.image_url,
      thumbnails: row.thumbnails,
      badge: row.badge,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
  id: String,
  name: String,
  description: String,
  icon: String,
  display_order: i32,
}

#[derive(Clone)]
pub struct PgCatalogStore {
  pool: PgPool,
}

impl PgCatalogStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
  async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
    let rows: Vec<ProductRow> = match category {
      Some(category) => {
        sqlx::query_as(&format!(
          "SELECT {} FROM products WHERE category = $1 ORDER BY name ASC",
          PRODUCT_COLUMNS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await
      }
      None => {
        sqlx::query_as(&format!("SELECT {} FROM products ORDER BY name ASC", PRODUCT_COLUMNS))
          .fetch_all(&self.pool)
          .await
      }
    }
    .map_err(ZibenError::persistence)?;
    Ok(rows.into_iter().map(Product::from).collect())
  }

  async fn get_product(&self, id: &str) -> Result<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(ZibenError::persistence)?;
    Ok(row.map(Product::from))
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(
      "SELECT id, name, description, icon, display_order FROM categories ORDER BY display_order ASC, name ASC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(ZibenError::persistence)?;
    Ok(
      rows
        .into_iter()
        .map(|r| Category {
          id: r.id,
          name: r.name,
          description: r.description,
          icon: r.icon,
          display_order: r.display_order,
        })
        .collect(),
    )
  }
}
