// core/src/identity/mod.rs

//! Binds authenticated identities to stored profiles and decides roles at creation time.

pub mod password;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{Result, ZibenError};
use crate::models::{Role, UserProfile};
use crate::store::{Credential, CredentialStore, ProfileStore};

const MIN_PASSWORD_LEN: usize = 6;
const FEDERATED_DEFAULT_NAME: &str = "User";

/// An identity some provider has vouched for.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthIdentity {
  pub uid: String,
  pub email: String,
  pub display_name: Option<String>,
}

/// Verifies a federated sign-in token (e.g. a Google ID token).
#[async_trait]
pub trait FederatedVerifier: Send + Sync {
  async fn verify(&self, id_token: &str) -> Result<AuthIdentity>;
}

/// Explicit administrator allow-list. Matching is case-insensitive and ignores surrounding spaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminPolicy {
  admin_emails: Vec<String>,
}

impl AdminPolicy {
  pub fn new<I, S>(emails: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let admin_emails = emails
      .into_iter()
      .map(|e| normalize_email(e.as_ref()))
      .filter(|e| !e.is_empty())
      .collect();
    Self { admin_emails }
  }

  /// Parses a comma-separated list such as `ADMIN_EMAILS`.
  pub fn from_list(list: &str) -> Self {
    Self::new(list.split(','))
  }

  pub fn role_for(&self, email: &str) -> Role {
    let email = normalize_email(email);
    if self.admin_emails.iter().any(|a| *a == email) {
      Role::Admin
    } else {
      Role::User
    }
  }
}

fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
  pub email: String,
  pub password: String,
  pub name: String,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub company: Option<String>,
}

pub struct IdentityService {
  credentials: Arc<dyn CredentialStore>,
  profiles: Arc<dyn ProfileStore>,
  federated: Option<Arc<dyn FederatedVerifier>>,
  admin_policy: AdminPolicy,
}

impl IdentityService {
  pub fn new(
    credentials: Arc<dyn CredentialStore>,
    profiles: Arc<dyn ProfileStore>,
    federated: Option<Arc<dyn FederatedVerifier>>,
    admin_policy: AdminPolicy,
  ) -> Self {
    Self {
      credentials,
      profiles,
      federated,
      admin_policy,
    }
  }

  /// Creates an email/password account and its profile. The role is decided here, once.
  #[instrument(name = "identity::register", skip(self, registration), fields(email = %registration.email), err(Display))]
  pub async fn register(&self, registration: Registration) -> Result<UserProfile> {
    let email = normalize_email(&registration.email);
    let name = registration.name.trim().to_string();
    if email.is_empty() || !email.contains('@') {
      return Err(ZibenError::Validation("A valid email is required.".to_string()));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(ZibenError::Validation(format!(
        "Password must be at least {} characters long.",
        MIN_PASSWORD_LEN
      )));
    }
    if name.is_empty() {
      return Err(ZibenError::Validation("Name is required.".to_string()));
    }

    let uid = Uuid::new_v4().to_string();
    let password_hash = password::hash_password(&registration.password)?;
    self
      .credentials
      .insert(Credential {
        uid: uid.clone(),
        email: email.clone(),
        password_hash,
      })
      .await?;

    let role = self.admin_policy.role_for(&email);
    let profile = UserProfile {
      uid,
      email: email.clone(),
      name,
      role,
      phone: non_blank(registration.phone),
      company: non_blank(registration.company),
      created_at: Utc::now(),
    };
    let profile = match self.profiles.insert(profile).await {
      Ok(profile) => profile,
      Err(e) => {
        // Without its profile the credential could never sign in, so release the email.
        if let Err(cleanup) = self.credentials.remove(&email).await {
          error!(error = %cleanup, "Failed to release credential after profile insert failed.");
        }
        return Err(e);
      }
    };
    info!(uid = %profile.uid, role = %profile.role, "Account registered.");
    Ok(profile)
  }

  /// Email/password sign-in. Unknown email and wrong password fail identically.
  #[instrument(name = "identity::sign_in", skip(self, password), err(Display))]
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile> {
    let invalid = || ZibenError::Auth("Invalid email or password.".to_string());

    let credential = self
      .credentials
      .find_by_email(&normalize_email(email))
      .await?
      .ok_or_else(invalid)?;
    if !password::verify_password(&credential.password_hash, password)? {
      warn!("Password mismatch on sign-in.");
      return Err(invalid());
    }

    self.profiles.get(&credential.uid).await?.ok_or_else(|| {
      warn!(uid = %credential.uid, "Credential has no profile.");
      invalid()
    })
  }

  /// Federated sign-in. First sign-in creates a profile, always with [`Role::User`].
  #[instrument(name = "identity::federated_sign_in", skip(self, id_token), err(Display))]
  pub async fn federated_sign_in(&self, id_token: &str) -> Result<UserProfile> {
    let verifier = self
      .federated
      .as_ref()
      .ok_or_else(|| ZibenError::Auth("Federated sign-in is not enabled.".to_string()))?;
    if id_token.trim().is_empty() {
      return Err(ZibenError::Validation("An ID token is required.".to_string()));
    }

    let identity = verifier.verify(id_token).await?;
    let uid = identity.uid.clone();
    if let Some(existing) = self.profiles.get(&uid).await? {
      return Ok(existing);
    }

    let profile = UserProfile {
      uid: identity.uid,
      email: normalize_email(&identity.email),
      name: identity
        .display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| FEDERATED_DEFAULT_NAME.to_string()),
      role: Role::User,
      phone: None,
      company: None,
      created_at: Utc::now(),
    };

    match self.profiles.insert(profile).await {
      Ok(created) => {
        info!(uid = %created.uid, "Profile created on first federated sign-in.");
        Ok(created)
      }
      // Concurrent first sign-ins: whoever lost the race reads the winner's profile.
      Err(ZibenError::Conflict(_)) => self
        .profiles
        .get(&uid)
        .await?
        .ok_or_else(|| ZibenError::Internal("Profile vanished after conflict.".to_string())),
      Err(e) => Err(e),
    }
  }

  #[instrument(name = "identity::profile", skip(self), err(Display))]
  pub async fn profile(&self, uid: &str) -> Result<UserProfile> {
    self
      .profiles
      .get(uid)
      .await?
      .ok_or_else(|| ZibenError::NotFound(format!("Profile '{}' not found.", uid)))
  }

  #[instrument(name = "identity::list_profiles", skip(self), err(Display))]
  pub async fn list_profiles(&self) -> Result<Vec<UserProfile>> {
    self.profiles.list().await
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
