// storefront/src/web/extractors.rs

//! Bearer-session extractors.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use tracing::warn;

use ziben::{Role, Viewer};

use crate::errors::AppError;
use crate::services::SessionClaims;
use crate::state::AppState;

/// Pulls the token out of `Authorization: Bearer <token>`. `Ok(None)` when the header is absent.
fn bearer_token(req: &HttpRequest) -> Result<Option<&str>, AppError> {
  let Some(value) = req.headers().get(AUTHORIZATION) else {
    return Ok(None);
  };
  let value = value
    .to_str()
    .map_err(|_| AppError::unauthorized("Malformed Authorization header."))?;
  match value.split_once(' ') {
    Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
      Ok(Some(token.trim()))
    }
    _ => Err(AppError::unauthorized("Expected a Bearer token.")),
  }
}

fn session_from(req: &HttpRequest) -> Result<Option<SessionClaims>, AppError> {
  let Some(token) = bearer_token(req)? else {
    return Ok(None);
  };
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
  state.sessions.verify(token).map(Some).map_err(|e| {
    warn!(error = %e, "Rejected session token.");
    e
  })
}

/// A caller with a valid session. Requests without one fail with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionClaims);

impl AuthenticatedUser {
  pub fn uid(&self) -> &str {
    &self.0.sub
  }

  pub fn viewer(&self) -> Viewer {
    Viewer {
      uid: self.0.sub.clone(),
      role: self.0.role,
    }
  }

  pub fn require_admin(&self) -> Result<(), AppError> {
    if self.0.role == Role::Admin {
      Ok(())
    } else {
      warn!(uid = %self.0.sub, "Non-admin attempted an admin operation.");
      Err(AppError::forbidden("Administrator access is required."))
    }
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
    ready(session_from(req).and_then(|claims| {
      claims
        .map(AuthenticatedUser)
        .ok_or_else(|| AppError::unauthorized("Sign-in required."))
    }))
  }
}

/// Session if one was presented. A missing header is fine; a bad token is still a 401.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<SessionClaims>);

impl FromRequest for OptionalSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
    ready(session_from(req).map(OptionalSession))
  }
}
