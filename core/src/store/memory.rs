// core/src/store/memory.rs

//! In-process stores guarded by `parking_lot` locks.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Result, ZibenError};
use crate::models::{Category, NewOrder, OrderRecord, Product, UserProfile};
use crate::store::{CatalogStore, Credential, CredentialStore, OrderStore, ProfileStore};

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
  orders: RwLock<Vec<OrderRecord>>,
}

impl MemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.orders.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.orders.read().is_empty()
  }

  pub fn snapshot(&self) -> Vec<OrderRecord> {
    self.orders.read().clone()
  }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
  async fn insert(&self, order: NewOrder) -> Result<OrderRecord> {
    let mut guard = self.orders.write();
    if guard.iter().any(|o| o.payment_key == order.payment_key) {
      return Err(ZibenError::Conflict(format!(
        "An order for payment key '{}' is already recorded.",
        order.payment_key
      )));
    }
    let record = order.into_record(Uuid::new_v4().to_string(), Utc::now());
    guard.push(record.clone());
    Ok(record)
  }

  async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>> {
    Ok(
      self
        .orders
        .read()
        .iter()
        .filter(|o| o.user_id.as_deref() == Some(user_id))
        .cloned()
        .collect(),
    )
  }

  async fn list_all(&self) -> Result<Vec<OrderRecord>> {
    Ok(self.orders.read().clone())
  }
}

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
  profiles: RwLock<Vec<UserProfile>>,
}

impl MemoryProfileStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
  async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
    Ok(self.profiles.read().iter().find(|p| p.uid == uid).cloned())
  }

  async fn insert(&self, profile: UserProfile) -> Result<UserProfile> {
    let mut guard = self.profiles.write();
    if guard.iter().any(|p| p.uid == profile.uid) {
      return Err(ZibenError::Conflict(format!("Profile '{}' already exists.", profile.uid)));
    }
    guard.push(profile.clone());
    Ok(profile)
  }

  async fn list(&self) -> Result<Vec<UserProfile>> {
    Ok(self.profiles.read().clone())
  }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
  credentials: RwLock<Vec<Credential>>,
}

impl MemoryCredentialStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
  async fn insert(&self, credential: Credential) -> Result<()> {
    let mut guard = self.credentials.write();
    if guard.iter().any(|c| c.email == credential.email) {
      return Err(ZibenError::Conflict(
        "An account with this email already exists.".to_string(),
      ));
    }
    guard.push(credential);
    Ok(())
  }

  async fn remove(&self, email: &str) -> Result<()> {
    self.credentials.write().retain(|c| c.email != email);
    Ok(())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
    Ok(self.credentials.read().iter().find(|c| c.email == email).cloned())
  }
}

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
  products: RwLock<Vec<Product>>,
  categories: RwLock<Vec<Category>>,
}

impl MemoryCatalogStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_catalog(products: Vec<Product>, categories: Vec<Category>) -> Self {
    Self {
      products: RwLock::new(products),
      categories: RwLock::new(categories),
    }
  }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
  async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
    let mut products: Vec<Product> = self
      .products
      .read()
      .iter()
      .filter(|p| category.map_or(true, |c| p.category == c))
      .cloned()
      .collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(products)
  }

  async fn get_product(&self, id: &str) -> Result<Option<Product>> {
    Ok(self.products.read().iter().find(|p| p.id == id).cloned())
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let mut categories = self.categories.read().clone();
    categories.sort_by_key(|c| c.display_order);
    Ok(categories)
  }
}
