// storefront/src/db/credentials.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use ziben::{Credential, CredentialStore, Result, ZibenError};

use super::store_error;

#[derive(Debug, FromRow)]
struct CredentialRow {
  uid: String,
  email: String,
  password_hash: String,
}

#[derive(Clone)]
pub struct PgCredentialStore {
  pool: PgPool,
}

impl PgCredentialStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
  async fn insert(&self, credential: Credential) -> Result<()> {
    sqlx::query("INSERT INTO user_credentials (email, uid, password_hash) VALUES ($1, $2, $3)")
      .bind(&credential.email)
      .bind(&credential.uid)
      .bind(&credential.password_hash)
      .execute(&self.pool)
      .await
      .map_err(|e| store_error(e, || "An account with this email already exists.".to_string()))?;
    Ok(())
  }

  async fn remove(&self, email: &str) -> Result<()> {
    sqlx::query("DELETE FROM user_credentials WHERE email = $1")
      .bind(email.trim().to_lowercase())
      .execute(&self.pool)
      .await
      .map_err(ZibenError::persistence)?;
    Ok(())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Credential>> {
    let row: Option<CredentialRow> =
      sqlx::query_as("SELECT uid, email, password_hash FROM user_credentials WHERE email = $1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(ZibenError::persistence)?;
    Ok(row.map(|r| Credential {
      uid: r.uid,
      email: r.email,
      password_hash: r.password_hash,
    }))
  }
}
