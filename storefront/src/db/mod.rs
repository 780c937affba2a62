// storefront/src/db/mod.rs

//! Postgres implementations of the storage ports.

mod catalog;
mod credentials;
mod orders;
mod profiles;
pub mod seed;

pub use catalog::PgCatalogStore;
pub use credentials::PgCredentialStore;
pub use orders::PgOrderStore;
pub use profiles::PgProfileStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info, instrument};

use ziben::ZibenError;

use crate::config::AppConfig;
use crate::errors::Result;

#[instrument(name = "db::connect", skip(config), fields(max_connections = config.database_max_connections), err(Display))]
pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .connect(&config.database_url)
    .await
    .map_err(|e| {
      error!(error = %e, "Failed to connect to the database.");
      e
    })?;
  info!("Successfully connected to the database.");

  sqlx::migrate!("./migrations").run(&pool).await?;
  info!("Database migrations applied.");
  Ok(pool)
}

/// Maps a unique-key violation to `Conflict` and everything else to `Persistence`.
pub(crate) fn store_error(err: sqlx::Error, conflict: impl FnOnce() -> String) -> ZibenError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() {
      return ZibenError::Conflict(conflict());
    }
  }
  ZibenError::persistence(err)
}
