// storefront/src/services/session.rs

//! HS256 session tokens handed out after sign-in.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use ziben::{Role, UserProfile, ZibenError};

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
  pub sub: String,
  pub email: String,
  pub role: Role,
  pub iat: i64,
  pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedSession {
  pub token: String,
  pub token_type: &'static str,
  pub expires_in: u64,
}

#[derive(Clone)]
pub struct SessionIssuer {
  secret: String,
  ttl: Duration,
}

impl SessionIssuer {
  pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
    Self {
      secret: secret.into(),
      ttl,
    }
  }

  pub fn issue(&self, profile: &UserProfile) -> Result<IssuedSession> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(self.ttl.as_secs())
      .ok()
      .and_then(|ttl| now.checked_add(ttl))
      .ok_or_else(|| AppError::Config(format!("Session lifetime {:?} is out of range.", self.ttl)))?;
    let claims = SessionClaims {
      sub: profile.uid.clone(),
      email: profile.email.clone(),
      role: profile.role,
      iat: now,
      exp,
    };
    let token = encode(
      &Header::new(Algorithm::HS256),
      &claims,
      &EncodingKey::from_secret(self.secret.as_bytes()),
    )
    .map_err(|e| {
      error!(error = %e, "Failed to sign session token.");
      AppError::Internal(format!("Session token creation failed: {}", e))
    })?;
    debug!(uid = %profile.uid, "Session issued.");

    Ok(IssuedSession {
      token,
      token_type: "Bearer",
      expires_in: self.ttl.as_secs(),
    })
  }

  pub fn verify(&self, token: &str) -> Result<SessionClaims> {
    let data = decode::<SessionClaims>(
      token,
      &DecodingKey::from_secret(self.secret.as_bytes()),
      &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
      ErrorKind::ExpiredSignature => AppError::Domain(ZibenError::Auth("Session expired.".to_string())),
      _ => AppError::Domain(ZibenError::Auth("Invalid session token.".to_string())),
    })?;
    Ok(data.claims)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn profile(role: Role) -> UserProfile {
    UserProfile {
      uid: "u-1".to_string(),
      email: "kim@example.com".to_string(),
      name: "김지수".to_string(),
      role,
      phone: None,
      company: None,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn issued_token_verifies_with_same_secret() {
    let issuer = SessionIssuer::new("secret", Duration::from_secs(3600));
    let session = issuer.issue(&profile(Role::Admin)).unwrap();
    assert_eq!(session.token_type, "Bearer");
    assert_eq!(session.expires_in, 3600);

    let claims = issuer.verify(&session.token).unwrap();
    assert_eq!(claims.sub, "u-1");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp - claims.iat, 3600);
  }

  #[test]
  fn out_of_range_lifetime_is_an_error() {
    let issuer = SessionIssuer::new("secret", Duration::from_secs(u64::MAX));
    let err = issuer.issue(&profile(Role::User)).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  fn token_from_other_secret_is_rejected() {
    let session = SessionIssuer::new("one", Duration::from_secs(60))
      .issue(&profile(Role::User))
      .unwrap();
    let err = SessionIssuer::new("two", Duration::from_secs(60))
      .verify(&session.token)
      .unwrap_err();
    assert!(matches!(err, AppError::Domain(ZibenError::Auth(_))));
  }

  #[test]
  fn expired_token_is_rejected() {
    let issuer = SessionIssuer::new("secret", Duration::from_secs(60));
    let now = Utc::now().timestamp();
    let stale = SessionClaims {
      sub: "u-1".into(),
      email: "kim@example.com".into(),
      role: Role::User,
      iat: now - 7200,
      exp: now - 3600,
    };
    let token = encode(
      &Header::new(Algorithm::HS256),
      &stale,
      &EncodingKey::from_secret(b"secret"),
    )
    .unwrap();
    let err = issuer.verify(&token).unwrap_err();
    assert!(matches!(err, AppError::Domain(ZibenError::Auth(m)) if m == "Session expired."));
  }
}
