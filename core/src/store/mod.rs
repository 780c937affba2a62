// core/src/store/mod.rs

//! Storage ports. The storefront binary backs these with Postgres; [`memory`] backs tests.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, NewOrder, OrderRecord, Product, UserProfile};

/// Append-only order collection.
#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Writes a new order under a fresh record id.
  ///
  /// Fails with [`crate::ZibenError::Conflict`] if an order with the same `payment_key` exists.
  async fn insert(&self, order: NewOrder) -> Result<OrderRecord>;

  async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>>;

  async fn list_all(&self) -> Result<Vec<OrderRecord>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
  async fn get(&self, uid: &str) -> Result<Option<UserProfile>>;

  /// Fails with [`crate::ZibenError::Conflict`] if a profile with the same uid exists.
  async fn insert(&self, profile: UserProfile) -> Result<UserProfile>;

  async fn list(&self) -> Result<Vec<UserProfile>>;
}

/// Stored password credential. `email` is always lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
  pub uid: String,
  pub email: String,
  pub password_hash: String,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
  /// Fails with [`crate::ZibenError::Conflict`] if the email is already registered.
  async fn insert(&self, credential: Credential) -> Result<()>;

  /// Deletes the credential for `email`. Removing an unknown email is not an error.
  async fn remove(&self, email: &str) -> Result<()>;

  async fn find_by_email(&self, email: &str) -> Result<Option<Credential>>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// Products ordered by name, optionally restricted to one category.
  async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>>;

  async fn get_product(&self, id: &str) -> Result<Option<Product>>;

  /// Categories in display order.
  async fn list_categories(&self) -> Result<Vec<Category>>;
}
