// storefront/src/db/profiles.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use ziben::{ProfileStore, Result, Role, UserProfile, ZibenError};

use super::store_error;

#[derive(Debug, FromRow)]
struct ProfileRow {
  uid: String,
  email: String,
  name: String,
  role: String,
  phone: Option<String>,
  company: Option<String>,
  created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for UserProfile {
  type Error = ZibenError;

  fn try_from(row: ProfileRow) -> Result<Self> {
    Ok(UserProfile {
      role: row.role.parse::<Role>()?,
      uid: row.uid,
      email: row.email,
      name: row.name,
      phone: row.phone,
      company: row.company,
      created_at: row.created_at,
    })
  }
}

#[derive(Clone)]
pub struct PgProfileStore {
  pool: PgPool,
}

impl PgProfileStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
  async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
    let row: Option<ProfileRow> = sqlx::query_as(
      "SELECT uid, email, name, role, phone, company, created_at FROM user_profiles WHERE uid = $1",
    )
    .bind(uid)
    .fetch_optional(&self.pool)
    .await
    .map_err(ZibenError::persistence)?;
    row.map(UserProfile::try_from).transpose()
  }

  #[instrument(name = "pg::profiles::insert", skip(self, profile), fields(uid = %profile.uid), err(Display))]
  async fn insert(&self, profile: UserProfile) -> Result<UserProfile> {
    sqlx::query(
      "INSERT INTO user_profiles (uid, email, name, role, phone, company, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&profile.uid)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(profile.role.as_str())
    .bind(&profile.phone)
    .bind(&profile.company)
    .bind(profile.created_at)
    .execute(&self.pool)
    .await
    .map_err(|e| store_error(e, || format!("Profile {} already exists.", profile.uid)))?;
    Ok(profile)
  }

  async fn list(&self) -> Result<Vec<UserProfile>> {
    let rows: Vec<ProfileRow> = sqlx::query_as(
      "SELECT uid, email, name, role, phone, company, created_at FROM user_profiles ORDER BY created_at DESC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(ZibenError::persistence)?;
    rows.into_iter().map(UserProfile::try_from).collect()
  }
}
