// core/src/catalog.rs

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{Result, ZibenError};
use crate::models::{Category, Product};
use crate::store::CatalogStore;

/// Read-only access to products and categories.
pub struct CatalogReader {
  store: Arc<dyn CatalogStore>,
}

impl CatalogReader {
  pub fn new(store: Arc<dyn CatalogStore>) -> Self {
    Self { store }
  }

  #[instrument(name = "catalog::list_products", skip(self), err(Display))]
  pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    let products = self.store.list_products(category).await?;
    info!(count = products.len(), "Fetched products.");
    Ok(products)
  }

  #[instrument(name = "catalog::get_product", skip(self), err(Display))]
  pub async fn get_product(&self, id: &str) -> Result<Product> {
    match self.store.get_product(id).await? {
      Some(product) => Ok(product),
      None => {
        warn!("Product not found.");
        Err(ZibenError::NotFound(format!("Product with ID {} not found.", id)))
      }
    }
  }

  #[instrument(name = "catalog::list_categories", skip(self), err(Display))]
  pub async fn list_categories(&self) -> Result<Vec<Category>> {
    self.store.list_categories().await
  }
}
