// storefront/src/services/google_identity.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use ziben::{AuthIdentity, FederatedVerifier, Result, ZibenError};

#[derive(Debug, Deserialize)]
struct TokenInfo {
  aud: Option<String>,
  sub: Option<String>,
  email: Option<String>,
  // tokeninfo sends this as the string "true", some proxies as a bool.
  email_verified: Option<Value>,
  name: Option<String>,
}

impl TokenInfo {
  fn email_is_verified(&self) -> bool {
    match &self.email_verified {
      Some(Value::Bool(b)) => *b,
      Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
      _ => false,
    }
  }
}

/// Checks Google ID tokens against the tokeninfo endpoint.
#[derive(Clone)]
pub struct GoogleTokenVerifier {
  http: Client,
  client_id: String,
  tokeninfo_url: String,
}

impl GoogleTokenVerifier {
  pub fn new(http: Client, client_id: impl Into<String>, tokeninfo_url: impl Into<String>) -> Self {
    Self {
      http,
      client_id: client_id.into(),
      tokeninfo_url: tokeninfo_url.into(),
    }
  }

  fn identity_from(&self, info: TokenInfo) -> Result<AuthIdentity> {
    if info.aud.as_deref() != Some(self.client_id.as_str()) {
      warn!(aud = info.aud.as_deref().unwrap_or(""), "ID token was issued for another client.");
      return Err(ZibenError::Auth("Invalid identity token.".to_string()));
    }
    if !info.email_is_verified() {
      return Err(ZibenError::Auth("The account email is not verified.".to_string()));
    }
    let sub = info
      .sub
      .filter(|s| !s.trim().is_empty())
      .ok_or_else(|| ZibenError::Auth("Invalid identity token.".to_string()))?;
    let email = info
      .email
      .filter(|e| !e.trim().is_empty())
      .ok_or_else(|| ZibenError::Auth("The identity token carries no email.".to_string()))?;

    Ok(AuthIdentity {
      uid: format!("google:{}", sub),
      email: email.trim().to_lowercase(),
      display_name: info.name.filter(|n| !n.trim().is_empty()),
    })
  }
}

#[async_trait]
impl FederatedVerifier for GoogleTokenVerifier {
  #[instrument(name = "google::verify", skip(self, id_token), err(Display))]
  async fn verify(&self, id_token: &str) -> Result<AuthIdentity> {
    let response = self
      .http
      .get(&self.tokeninfo_url)
      .query(&[("id_token", id_token)])
      .send()
      .await
      .map_err(|e| {
        error!(error = %e, "Google tokeninfo request failed.");
        ZibenError::Upstream {
          status: 502,
          message: "The identity provider could not be reached.".to_string(),
        }
      })?;

    if !response.status().is_success() {
      warn!(status = response.status().as_u16(), "Google rejected the ID token.");
      return Err(ZibenError::Auth("Invalid identity token.".to_string()));
    }

    let info: TokenInfo = response.json().await.map_err(|e| {
      error!(error = %e, "Unreadable tokeninfo response.");
      ZibenError::Upstream {
        status: 502,
        message: "Unreadable identity provider response.".to_string(),
      }
    })?;
    let identity = self.identity_from(info)?;
    info!(uid = %identity.uid, "Google ID token verified.");
    Ok(identity)
  }
}
