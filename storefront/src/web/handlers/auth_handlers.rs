// storefront/src/web/handlers/auth_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use ziben::{Registration, UserProfile};

use crate::errors::AppError;
use crate::services::IssuedSession;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedRequestPayload {
  pub id_token: String,
}

// --- Response DTOs ---
#[derive(Serialize)]
struct SessionResponse {
  #[serde(flatten)]
  session: IssuedSession,
  profile: UserProfile,
}

fn session_response(
  app_state: &AppState,
  status: StatusCode,
  profile: UserProfile,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.issue(&profile)?;
  Ok(HttpResponse::build(status).json(SessionResponse { session, profile }))
}

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
  let profile = app_state.identity.register(req_payload.into_inner()).await?;
  info!(uid = %profile.uid, role = %profile.role, "Account registered.");
  session_response(&app_state, StatusCode::CREATED, profile)
}

#[instrument(name = "handler::signin", skip(app_state, req_payload))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let profile = app_state
    .identity
    .sign_in(&req_payload.email, &req_payload.password)
    .await?;
  info!(uid = %profile.uid, "Signed in.");
  session_response(&app_state, StatusCode::OK, profile)
}

#[instrument(name = "handler::federated_signin", skip(app_state, req_payload))]
pub async fn federated_signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<FederatedRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let profile = app_state.identity.federated_sign_in(&req_payload.id_token).await?;
  info!(uid = %profile.uid, "Signed in with federated identity.");
  session_response(&app_state, StatusCode::OK, profile)
}

#[instrument(name = "handler::me", skip(app_state, user), fields(uid = %user.uid()))]
pub async fn me_handler(app_state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let profile = app_state.identity.profile(user.uid()).await?;
  Ok(HttpResponse::Ok().json(profile))
}
